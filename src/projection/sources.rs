// The three embedding sources: raw counts, an external model, and
// caller-supplied axes.

use std::sync::Arc;

use ndarray::{Array1, Array2};

use super::embedding::CategoryEmbedding;
use super::traits::{CategoryEmbeddingSource, EmbeddingModel};
use crate::error::Result;

/// Category embeddings are the category x term count matrix itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCounts;

impl CategoryEmbeddingSource for RawCounts {
    fn name(&self) -> &'static str {
        "raw-counts"
    }

    fn category_embeddings(
        &self,
        category_counts: &Array2<f64>,
        categories: &[String],
    ) -> Result<CategoryEmbedding> {
        CategoryEmbedding::new(categories.to_vec(), category_counts.t().to_owned())
    }
}

/// Category embeddings come from an external model's `project()`.
#[derive(Clone)]
pub struct ExternalModel {
    model: Arc<dyn EmbeddingModel>,
}

impl ExternalModel {
    pub fn new(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model }
    }
}

impl CategoryEmbeddingSource for ExternalModel {
    fn name(&self) -> &'static str {
        "external-model"
    }

    fn category_embeddings(
        &self,
        _category_counts: &Array2<f64>,
        _categories: &[String],
    ) -> Result<CategoryEmbedding> {
        self.model.project()
    }
}

/// Explicit per-category axis values plus the embedding snapshot taken when
/// the axes were set.
#[derive(Debug, Clone)]
pub struct ExplicitAxes {
    x_axis: Array1<f64>,
    y_axis: Array1<f64>,
    embeddings: CategoryEmbedding,
}

impl ExplicitAxes {
    pub fn new(x_axis: Array1<f64>, y_axis: Array1<f64>, embeddings: CategoryEmbedding) -> Self {
        Self {
            x_axis,
            y_axis,
            embeddings,
        }
    }
}

impl CategoryEmbeddingSource for ExplicitAxes {
    fn name(&self) -> &'static str {
        "explicit-axes"
    }

    fn category_embeddings(
        &self,
        _category_counts: &Array2<f64>,
        _categories: &[String],
    ) -> Result<CategoryEmbedding> {
        Ok(self.embeddings.clone())
    }

    fn axes(&self) -> Option<(&Array1<f64>, &Array1<f64>)> {
        Some((&self.x_axis, &self.y_axis))
    }
}
