// Reading corpus and category-matrix JSON files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::corpus::{Corpus, CorpusRecord};
use crate::projection::embedding::{CategoryEmbedding, CategoryMatrixRecord};

/// Load a corpus from `{ "terms", "categories", "documents" }` JSON.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
    let record: CorpusRecord = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse corpus file {}", path.display()))?;
    let corpus = Corpus::from_record(record)
        .with_context(|| format!("Invalid corpus in {}", path.display()))?;

    info!(
        path = %path.display(),
        documents = corpus.num_documents(),
        categories = corpus.categories().len(),
        "Loaded corpus"
    );
    Ok(corpus)
}

/// Load a labeled category matrix from `{ "categories", "values" }` JSON.
pub fn load_category_matrix(path: &Path) -> Result<CategoryEmbedding> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read category matrix {}", path.display()))?;
    let record: CategoryMatrixRecord = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse category matrix {}", path.display()))?;
    CategoryEmbedding::from_record(record)
        .with_context(|| format!("Invalid category matrix in {}", path.display()))
}
