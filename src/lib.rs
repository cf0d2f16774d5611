// Scatterscore: category projections and credibility-adjusted term scoring
//
// This is the library root. Each module corresponds to a major subsystem.
// The projection and scoring engines share nothing but the corpus contract.

pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod projection;
pub mod scoring;
