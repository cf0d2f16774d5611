// Library error type.
//
// Contract violations (bad dimensions, misordered embeddings, unknown
// categories) surface here. Numerical degeneracies do not: NaN and Inf are
// left in the output tables so they show up in downstream rankings.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScatterError>;

#[derive(Debug, Error)]
pub enum ScatterError {
    #[error("capability not implemented: {capability}")]
    Unimplemented { capability: &'static str },

    #[error("dimension {dim} out of range for a projection with {dims} dimensions")]
    DimensionOutOfRange { dim: usize, dims: usize },

    #[error("category order mismatch: expected {expected:?}, found {found:?}")]
    CategoryOrderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("category {0} is listed more than once")]
    DuplicateCategory(String),

    #[error("category {0} is assigned to both groups")]
    OverlappingGroups(String),

    #[error("{0} group has no documents")]
    EmptyGroup(&'static str),
}
