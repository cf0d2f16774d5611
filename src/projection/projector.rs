// CategoryProjection: 2D views of a precomputed category projection.
//
// The projection matrix has one row per category and one column per latent
// dimension. Two of those columns are picked as the working x and y axes.
// Each term then lands at the count-weighted combination of the category
// positions: `term_xy = category_counts (terms x categories) . [x_axis, y_axis]`.
//
// Term coordinates are recomputed on every query and never cached, so a
// projection re-sliced on different dimensions can never see stale values.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2};
use serde::Serialize;
use tracing::debug;

use super::embedding::CategoryEmbedding;
use super::scale::stretch_neg1_to_1;
use super::sources::{ExplicitAxes, ExternalModel, RawCounts};
use super::traits::{CategoryEmbeddingSource, EmbeddingModel};
use crate::corpus::CategoryCorpus;
use crate::error::{Result, ScatterError};

/// A labeled 2D point: a term (or category) and its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub term: String,
    pub x: f64,
    pub y: f64,
}

/// Rows of (term, x, y), in corpus order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PointTable {
    pub rows: Vec<Point>,
}

impl PointTable {
    fn from_columns(labels: &[String], x: &Array1<f64>, y: &Array1<f64>) -> Self {
        let rows = labels
            .iter()
            .zip(x.iter().zip(y.iter()))
            .map(|(term, (&x, &y))| Point {
                term: term.clone(),
                x,
                y,
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn x(&self) -> Array1<f64> {
        self.rows.iter().map(|p| p.x).collect()
    }

    pub fn y(&self) -> Array1<f64> {
        self.rows.iter().map(|p| p.y).collect()
    }

    pub fn get(&self, term: &str) -> Option<&Point> {
        self.rows.iter().find(|p| p.term == term)
    }

    fn terms_at(&self, order: &[usize], n: usize) -> Vec<String> {
        order
            .iter()
            .take(n)
            .map(|&i| self.rows[i].term.clone())
            .collect()
    }
}

/// Extreme terms along each axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxesLabels {
    pub right: Vec<String>,
    pub left: Vec<String>,
    pub top: Vec<String>,
    pub bottom: Vec<String>,
}

/// Terms closest to each compass point of the stretched [-1, 1] square.
///
/// There is no `center` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestTerms {
    pub top_right: Vec<String>,
    pub top: Vec<String>,
    pub top_left: Vec<String>,
    pub right: Vec<String>,
    pub left: Vec<String>,
    pub bottom_right: Vec<String>,
    pub bottom: Vec<String>,
    pub bottom_left: Vec<String>,
}

#[derive(Clone)]
pub struct CategoryProjection {
    corpus: Arc<dyn CategoryCorpus>,
    /// terms x categories
    category_counts: Arc<Array2<f64>>,
    /// categories x dims
    projection: Arc<Array2<f64>>,
    x_dim: usize,
    y_dim: usize,
    source: Arc<dyn CategoryEmbeddingSource>,
}

impl fmt::Debug for CategoryProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryProjection")
            .field("source", &self.source.name())
            .field("terms", &self.category_counts.nrows())
            .field("categories", &self.projection.nrows())
            .field("dims", &self.projection.ncols())
            .field("x_dim", &self.x_dim)
            .field("y_dim", &self.y_dim)
            .finish()
    }
}

impl CategoryProjection {
    /// Projection whose category embeddings are the raw category counts.
    pub fn new(
        corpus: Arc<dyn CategoryCorpus>,
        category_counts: Array2<f64>,
        projection: Array2<f64>,
        x_dim: usize,
        y_dim: usize,
    ) -> Result<Self> {
        Self::with_source(
            corpus,
            Arc::new(category_counts),
            Arc::new(projection),
            x_dim,
            y_dim,
            Arc::new(RawCounts),
        )
    }

    /// Raw-count projection from a category-labeled projection matrix.
    ///
    /// The projection rows must carry the corpus categories in corpus order.
    pub fn from_labeled(
        corpus: Arc<dyn CategoryCorpus>,
        category_counts: Array2<f64>,
        projection: CategoryEmbedding,
        x_dim: usize,
        y_dim: usize,
    ) -> Result<Self> {
        projection.ensure_order(corpus.metadata())?;
        Self::new(
            corpus,
            category_counts,
            projection.into_values(),
            x_dim,
            y_dim,
        )
    }

    /// Projection whose category embeddings come from an external model.
    pub fn with_model(
        corpus: Arc<dyn CategoryCorpus>,
        category_counts: Array2<f64>,
        projection: Array2<f64>,
        x_dim: usize,
        y_dim: usize,
        model: Arc<dyn EmbeddingModel>,
    ) -> Result<Self> {
        Self::with_source(
            corpus,
            Arc::new(category_counts),
            Arc::new(projection),
            x_dim,
            y_dim,
            Arc::new(ExternalModel::new(model)),
        )
    }

    /// Build a projection over any embedding source.
    ///
    /// Validates that the count matrix is terms x categories, that the
    /// projection has one row per category and at least two dimensions, and
    /// that both axis indices are in range.
    pub fn with_source(
        corpus: Arc<dyn CategoryCorpus>,
        category_counts: Arc<Array2<f64>>,
        projection: Arc<Array2<f64>>,
        x_dim: usize,
        y_dim: usize,
        source: Arc<dyn CategoryEmbeddingSource>,
    ) -> Result<Self> {
        let n_terms = corpus.terms().len();
        let n_categories = corpus.metadata().len();

        if category_counts.nrows() != n_terms {
            return Err(ScatterError::ShapeMismatch {
                what: "category count rows (terms)",
                expected: n_terms,
                found: category_counts.nrows(),
            });
        }
        if category_counts.ncols() != n_categories {
            return Err(ScatterError::ShapeMismatch {
                what: "category count columns (categories)",
                expected: n_categories,
                found: category_counts.ncols(),
            });
        }
        if projection.nrows() != n_categories {
            return Err(ScatterError::ShapeMismatch {
                what: "projection rows (categories)",
                expected: n_categories,
                found: projection.nrows(),
            });
        }
        if projection.ncols() < 2 {
            return Err(ScatterError::ShapeMismatch {
                what: "projection dimensions (minimum)",
                expected: 2,
                found: projection.ncols(),
            });
        }
        check_dim(x_dim, projection.ncols())?;
        check_dim(y_dim, projection.ncols())?;
        if let Some((x_axis, y_axis)) = source.axes() {
            check_axis_len("x axis length", x_axis, n_categories)?;
            check_axis_len("y axis length", y_axis, n_categories)?;
        }

        Ok(Self {
            corpus,
            category_counts,
            projection,
            x_dim,
            y_dim,
            source,
        })
    }

    pub fn x_dim(&self) -> usize {
        self.x_dim
    }

    pub fn y_dim(&self) -> usize {
        self.y_dim
    }

    pub fn dims(&self) -> usize {
        self.projection.ncols()
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Same corpus, counts, projection and embedding source, sliced on a
    /// different pair of dimensions.
    ///
    /// For a projection with explicit axes the new dimensions are recorded but
    /// the explicit axis values still win.
    pub fn project_with_alternative_dimensions(&self, x_dim: usize, y_dim: usize) -> Result<Self> {
        check_dim(x_dim, self.dims())?;
        check_dim(y_dim, self.dims())?;
        debug!(
            source = self.source.name(),
            x_dim, y_dim, "Re-slicing projection on alternative dimensions"
        );
        Ok(Self {
            x_dim,
            y_dim,
            ..self.clone()
        })
    }

    /// Replace one or both axes with caller-supplied values, one per category.
    ///
    /// An omitted axis keeps this projection's current values. The category
    /// embeddings are captured now, so later changes to an external model do
    /// not leak into the returned projection.
    pub fn project_with_alternate_axes(
        &self,
        x_axis: Option<Array1<f64>>,
        y_axis: Option<Array1<f64>>,
    ) -> Result<Self> {
        let n_categories = self.projection.nrows();
        let x_axis = x_axis.unwrap_or_else(|| self.x_axis());
        let y_axis = y_axis.unwrap_or_else(|| self.y_axis());
        check_axis_len("x axis length", &x_axis, n_categories)?;
        check_axis_len("y axis length", &y_axis, n_categories)?;

        let embeddings = self.category_embeddings()?;
        Ok(Self {
            source: Arc::new(ExplicitAxes::new(x_axis, y_axis, embeddings)),
            ..self.clone()
        })
    }

    /// The category embeddings behind this projection, checked against the
    /// corpus category order.
    pub fn category_embeddings(&self) -> Result<CategoryEmbedding> {
        let embeddings = self
            .source
            .category_embeddings(&self.category_counts, self.corpus.metadata())?;
        embeddings.ensure_order(self.corpus.metadata())?;
        Ok(embeddings)
    }

    /// Per-category x values.
    pub fn x_axis(&self) -> Array1<f64> {
        match self.source.axes() {
            Some((x, _)) => x.clone(),
            None => self.projection.column(self.x_dim).to_owned(),
        }
    }

    /// Per-category y values.
    pub fn y_axis(&self) -> Array1<f64> {
        match self.source.axes() {
            Some((_, y)) => y.clone(),
            None => self.projection.column(self.y_dim).to_owned(),
        }
    }

    /// Category positions on the working axes, one row per category.
    pub fn category_projection(&self) -> PointTable {
        PointTable::from_columns(self.corpus.metadata(), &self.x_axis(), &self.y_axis())
    }

    /// Term positions: each term's counts weighted by the category positions.
    pub fn term_projection(&self) -> PointTable {
        let mut xy = Array2::<f64>::zeros((self.projection.nrows(), 2));
        xy.column_mut(0).assign(&self.x_axis());
        xy.column_mut(1).assign(&self.y_axis());
        let coords = self.category_counts.dot(&xy);
        PointTable::from_columns(
            self.corpus.terms(),
            &coords.column(0).to_owned(),
            &coords.column(1).to_owned(),
        )
    }

    /// The `num_terms` most extreme terms in each axis direction.
    ///
    /// Each direction is an independent stable sort of the term projection;
    /// ties keep vocabulary order and NaN coordinates sort last.
    pub fn axes_labels(&self, num_terms: usize) -> AxesLabels {
        let table = self.term_projection();
        let x = table.x();
        let y = table.y();
        AxesLabels {
            right: table.terms_at(&rank(&x, Direction::Descending), num_terms),
            left: table.terms_at(&rank(&x, Direction::Ascending), num_terms),
            top: table.terms_at(&rank(&y, Direction::Descending), num_terms),
            bottom: table.terms_at(&rank(&y, Direction::Ascending), num_terms),
        }
    }

    /// The `num_terms` terms nearest each compass point, by squared Euclidean
    /// distance after stretching x and y independently onto [-1, 1].
    pub fn nearest_terms(&self, num_terms: usize) -> NearestTerms {
        let table = self.term_projection();
        let x = stretch_neg1_to_1(&table.x());
        let y = stretch_neg1_to_1(&table.y());

        let nearest = |tx: f64, ty: f64| -> Vec<String> {
            let dist = x
                .iter()
                .zip(y.iter())
                .map(|(&x, &y)| (x - tx).powi(2) + (y - ty).powi(2))
                .collect::<Array1<f64>>();
            table.terms_at(&rank(&dist, Direction::Ascending), num_terms)
        };

        NearestTerms {
            top_right: nearest(1.0, 1.0),
            top: nearest(0.0, 1.0),
            top_left: nearest(-1.0, 1.0),
            right: nearest(1.0, 0.0),
            left: nearest(-1.0, 0.0),
            bottom_right: nearest(1.0, -1.0),
            bottom: nearest(0.0, -1.0),
            bottom_left: nearest(-1.0, -1.0),
        }
    }
}

fn check_dim(dim: usize, dims: usize) -> Result<()> {
    if dim >= dims {
        return Err(ScatterError::DimensionOutOfRange { dim, dims });
    }
    Ok(())
}

fn check_axis_len(what: &'static str, axis: &Array1<f64>, n_categories: usize) -> Result<()> {
    if axis.len() != n_categories {
        return Err(ScatterError::ShapeMismatch {
            what,
            expected: n_categories,
            found: axis.len(),
        });
    }
    Ok(())
}

#[derive(Clone, Copy)]
pub(crate) enum Direction {
    Ascending,
    Descending,
}

/// Indices of `values` in sorted order. Stable, so ties keep their original
/// order; NaN goes last in either direction.
pub(crate) fn rank(values: &Array1<f64>, direction: Direction) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let (va, vb) = (values[a], values[b]);
        match (va.is_nan(), vb.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match direction {
                Direction::Ascending => va.total_cmp(&vb),
                Direction::Descending => vb.total_cmp(&va),
            },
        }
    });
    order
}
