// Category projection: 2D term coordinates from a precomputed category
// projection, with axis labels and nearest-term queries.

pub mod embedding;
pub mod projector;
pub mod scale;
pub mod sources;
pub mod traits;
