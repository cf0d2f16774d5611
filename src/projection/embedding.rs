// Labeled category embeddings.
//
// Every embedding row is tagged with the category it belongs to so that row
// order can be checked against the corpus before any term coordinates are
// derived from it. A misordered embedding would otherwise produce plausible
// but wrong coordinates.

use ndarray::Array2;
use serde::Deserialize;

use crate::error::{Result, ScatterError};

/// One row per category, one column per latent dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEmbedding {
    categories: Vec<String>,
    values: Array2<f64>,
}

/// On-disk layout for a labeled category matrix (embeddings or projections).
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryMatrixRecord {
    pub categories: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CategoryEmbedding {
    pub fn new(categories: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != categories.len() {
            return Err(ScatterError::ShapeMismatch {
                what: "embedding rows",
                expected: categories.len(),
                found: values.nrows(),
            });
        }
        Ok(Self { categories, values })
    }

    pub fn from_record(record: CategoryMatrixRecord) -> Result<Self> {
        let dims = record.values.first().map(Vec::len).unwrap_or(0);
        let mut values = Array2::<f64>::zeros((record.values.len(), dims));
        for (i, row) in record.values.iter().enumerate() {
            if row.len() != dims {
                return Err(ScatterError::ShapeMismatch {
                    what: "embedding row width",
                    expected: dims,
                    found: row.len(),
                });
            }
            for (j, &v) in row.iter().enumerate() {
                values[[i, j]] = v;
            }
        }
        Self::new(record.categories, values)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Fail unless the rows are labeled exactly `expected`, in that order.
    pub fn ensure_order(&self, expected: &[String]) -> Result<()> {
        if self.categories != expected {
            return Err(ScatterError::CategoryOrderMismatch {
                expected: expected.to_vec(),
                found: self.categories.clone(),
            });
        }
        Ok(())
    }
}
