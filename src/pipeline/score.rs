// Scoring flow: corpus -> two document groups -> cred-tf-idf table,
// optionally bootstrapped.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::corpus::{CategoryCorpus, Corpus};
use crate::scoring::cred_tfidf::{BootstrapScore, CredScore, CredTfIdf};
use crate::scoring::traits::TermScorer;

pub struct ScoreOptions {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub eta: f64,
    pub use_sublinear: bool,
    /// Number of bootstrap resamples, or None for a single point estimate
    pub bootstrap: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScoreReport {
    Point {
        name: &'static str,
        rows: Vec<CredScore>,
    },
    Bootstrap {
        name: &'static str,
        rows: Vec<BootstrapScore>,
    },
}

/// Score every term for the positive vs negative category groups.
pub fn run(corpus: &Corpus, options: &ScoreOptions) -> Result<ScoreReport> {
    let split = corpus
        .split(&options.positive, &options.negative)
        .context("Failed to split corpus into positive and negative groups")?;
    let scorer = CredTfIdf::new(split, corpus.terms())
        .context("Failed to build cred-tf-idf scorer")?
        .with_eta(options.eta)
        .with_sublinear(options.use_sublinear);

    info!(
        positive = ?options.positive,
        negative = ?options.negative,
        terms = scorer.terms().len(),
        eta = scorer.eta(),
        sublinear = scorer.use_sublinear(),
        "Scoring terms"
    );

    let Some(num_bootstraps) = options.bootstrap else {
        return Ok(ScoreReport::Point {
            name: scorer.name(),
            rows: scorer.score_df(),
        });
    };

    if num_bootstraps == 0 {
        anyhow::bail!("Bootstrap needs at least one resample (got 0)");
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let pb = ProgressBar::new(num_bootstraps as u64);
    pb.set_style(
        ProgressStyle::default_bar().template("  Bootstrap [{bar:30}] {pos}/{len} ({eta})")?,
    );
    let rows = scorer.bootstrap_score_df(num_bootstraps, &mut rng, |_| pb.inc(1));
    pb.finish_and_clear();

    Ok(ScoreReport::Bootstrap {
        name: scorer.name(),
        rows,
    })
}
