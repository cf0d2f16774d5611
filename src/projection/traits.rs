// Embedding capabilities: what a projection variant must be able to supply.
//
// A projection is always sliced from the same precomputed matrix. Variants
// differ only in where their category embeddings come from and whether the
// two working axes are taken from the projection or supplied directly.

use ndarray::{Array1, Array2};

use super::embedding::CategoryEmbedding;
use crate::error::{Result, ScatterError};

/// An externally trained model (doc2vec-style) that can place each category
/// in its latent space.
pub trait EmbeddingModel: Send + Sync {
    /// One row per category, labeled, in whatever order the model keeps them.
    fn project(&self) -> Result<CategoryEmbedding>;
}

/// Source of the category embeddings behind a projection.
pub trait CategoryEmbeddingSource: Send + Sync {
    /// Short name used in logs and terminal output.
    fn name(&self) -> &'static str;

    /// Produce the category embeddings. `category_counts` is terms x categories
    /// and `categories` is the corpus category order.
    fn category_embeddings(
        &self,
        _category_counts: &Array2<f64>,
        _categories: &[String],
    ) -> Result<CategoryEmbedding> {
        Err(ScatterError::Unimplemented {
            capability: "category_embeddings",
        })
    }

    /// Explicit (x, y) axis values, one per category, overriding the
    /// projection slice. `None` means slice the projection.
    fn axes(&self) -> Option<(&Array1<f64>, &Array1<f64>)> {
        None
    }
}
