// Projection flow: corpus + precomputed projection -> term coordinates,
// axis labels and nearest terms.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::corpus::Corpus;
use crate::projection::embedding::CategoryEmbedding;
use crate::projection::projector::{AxesLabels, CategoryProjection, NearestTerms, PointTable};

pub struct ProjectOptions {
    pub x_dim: usize,
    pub y_dim: usize,
    pub num_terms: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub x_dim: usize,
    pub y_dim: usize,
    pub term_projection: PointTable,
    pub axes_labels: AxesLabels,
    pub nearest_terms: NearestTerms,
}

/// Build a raw-count projection over `corpus` and run every query on it.
///
/// The projection rows must be labeled with the corpus categories in corpus
/// order.
pub fn run(
    corpus: Arc<Corpus>,
    projection: CategoryEmbedding,
    options: &ProjectOptions,
) -> Result<ProjectionReport> {
    let category_counts = corpus.category_counts();
    let projector = CategoryProjection::from_labeled(
        corpus,
        category_counts,
        projection,
        options.x_dim,
        options.y_dim,
    )
    .context("Failed to build category projection")?;

    info!(
        dims = projector.dims(),
        x_dim = projector.x_dim(),
        y_dim = projector.y_dim(),
        "Projecting terms"
    );

    Ok(ProjectionReport {
        x_dim: projector.x_dim(),
        y_dim: projector.y_dim(),
        term_projection: projector.term_projection(),
        axes_labels: projector.axes_labels(options.num_terms),
        nearest_terms: projector.nearest_terms(options.num_terms),
    })
}
