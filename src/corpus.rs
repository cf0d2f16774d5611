// Corpus: the in-memory term/document store both components read from.
//
// Counts are held as a dense documents x terms matrix. Whatever shape the
// caller's data came in, it is converted once here and every downstream
// computation works on `Array2<f64>`.

use std::collections::HashMap;

use ndarray::{Array2, Axis};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ScatterError};

/// The view of a corpus that a category projection needs: an ordered
/// vocabulary and the ordered category labels.
pub trait CategoryCorpus: Send + Sync {
    /// Vocabulary in fixed order. Row `i` of a category-count matrix is `terms()[i]`.
    fn terms(&self) -> &[String];
    /// Category labels in fixed order. Column `j` of a category-count matrix,
    /// and row `j` of a projection, is `metadata()[j]`.
    fn metadata(&self) -> &[String];
}

/// A single document as supplied on disk: its category and a count per term.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    pub category: String,
    pub counts: Vec<f64>,
}

/// Serialized corpus layout accepted by `Corpus::from_record`.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusRecord {
    pub terms: Vec<String>,
    pub categories: Vec<String>,
    pub documents: Vec<DocumentRecord>,
}

#[derive(Debug, Clone)]
pub struct Corpus {
    terms: Vec<String>,
    categories: Vec<String>,
    /// Index into `categories` for each document row
    doc_categories: Vec<usize>,
    /// documents x terms
    counts: Array2<f64>,
}

/// Two disjoint document groups sliced out of a corpus, each documents x terms.
#[derive(Debug, Clone)]
pub struct GroupSplit {
    pub positive: Array2<f64>,
    pub negative: Array2<f64>,
}

impl Corpus {
    /// Build a corpus from a documents x terms count matrix.
    ///
    /// Category labels must be unique and every document category must appear
    /// in `categories`. The matrix must have one row per document and one
    /// column per term.
    pub fn new(
        terms: Vec<String>,
        categories: Vec<String>,
        doc_categories: &[String],
        counts: Array2<f64>,
    ) -> Result<Self> {
        if counts.ncols() != terms.len() {
            return Err(ScatterError::ShapeMismatch {
                what: "count matrix columns",
                expected: terms.len(),
                found: counts.ncols(),
            });
        }
        if counts.nrows() != doc_categories.len() {
            return Err(ScatterError::ShapeMismatch {
                what: "count matrix rows",
                expected: doc_categories.len(),
                found: counts.nrows(),
            });
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(categories.len());
        for (i, c) in categories.iter().enumerate() {
            if index.insert(c.as_str(), i).is_some() {
                return Err(ScatterError::DuplicateCategory(c.clone()));
            }
        }
        let doc_categories = doc_categories
            .iter()
            .map(|c| {
                index
                    .get(c.as_str())
                    .copied()
                    .ok_or_else(|| ScatterError::UnknownCategory(c.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            terms = terms.len(),
            categories = categories.len(),
            documents = doc_categories.len(),
            "Built corpus"
        );

        Ok(Self {
            terms,
            categories,
            doc_categories,
            counts,
        })
    }

    /// Build a corpus from its serialized form.
    pub fn from_record(record: CorpusRecord) -> Result<Self> {
        let n_terms = record.terms.len();
        let mut counts = Array2::<f64>::zeros((record.documents.len(), n_terms));
        let mut labels = Vec::with_capacity(record.documents.len());
        for (row, doc) in record.documents.iter().enumerate() {
            if doc.counts.len() != n_terms {
                return Err(ScatterError::ShapeMismatch {
                    what: "document counts",
                    expected: n_terms,
                    found: doc.counts.len(),
                });
            }
            for (col, &c) in doc.counts.iter().enumerate() {
                counts[[row, col]] = c;
            }
            labels.push(doc.category.clone());
        }
        Self::new(record.terms, record.categories, &labels, counts)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn num_documents(&self) -> usize {
        self.counts.nrows()
    }

    /// Per-category term counts: terms x categories, columns in category order.
    pub fn category_counts(&self) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((self.terms.len(), self.categories.len()));
        for (row, &cat) in self.counts.axis_iter(Axis(0)).zip(&self.doc_categories) {
            let mut column = out.column_mut(cat);
            column += &row;
        }
        out
    }

    /// Slice the corpus into two disjoint document groups by category.
    ///
    /// Documents whose category is in neither list are left out.
    pub fn split(&self, positive: &[String], negative: &[String]) -> Result<GroupSplit> {
        let pos = self.category_indices(positive)?;
        let neg = self.category_indices(negative)?;
        if let Some(&shared) = pos.iter().find(|c| neg.contains(c)) {
            return Err(ScatterError::OverlappingGroups(
                self.categories[shared].clone(),
            ));
        }

        let rows_in = |wanted: &[usize]| -> Vec<usize> {
            self.doc_categories
                .iter()
                .enumerate()
                .filter(|(_, c)| wanted.contains(c))
                .map(|(i, _)| i)
                .collect()
        };
        let pos_rows = rows_in(&pos);
        let neg_rows = rows_in(&neg);

        debug!(
            positive_docs = pos_rows.len(),
            negative_docs = neg_rows.len(),
            "Split corpus into groups"
        );

        Ok(GroupSplit {
            positive: self.counts.select(Axis(0), &pos_rows),
            negative: self.counts.select(Axis(0), &neg_rows),
        })
    }

    fn category_indices(&self, names: &[String]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.categories
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| ScatterError::UnknownCategory(name.clone()))
            })
            .collect()
    }
}

impl CategoryCorpus for Corpus {
    fn terms(&self) -> &[String] {
        &self.terms
    }

    fn metadata(&self) -> &[String] {
        &self.categories
    }
}
