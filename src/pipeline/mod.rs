// End-to-end flows behind the CLI: load inputs, build a projection or a
// scorer, and produce a report.

pub mod load;
pub mod project;
pub mod score;
