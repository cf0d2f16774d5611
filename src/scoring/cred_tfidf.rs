// Credibility-adjusted TF-IDF (Kim & Zhang, WASSA 2014).
//
// Ranks terms by how strongly they separate a positive document group from a
// negative one. Each term's "self-credibility" (how lopsided its counts are
// between the groups) is shrunk toward the corpus-wide average with Buhlmann
// credibility, and that shrunk score scales the term's (sublinear) frequency
// before IDF weighting and per-document L2 normalization. The reported score
// is the difference of the group means of the normalized weights.
//
// Both groups are dense documents x terms matrices. The conversion happened
// when the corpus was built, so there is one code path here.

use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::normal::normal_sf;
use super::running_stats::RunningStats;
use super::traits::TermScorer;
use crate::corpus::GroupSplit;
use crate::error::{Result, ScatterError};

/// One row of the score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredScore {
    pub term: String,
    pub pos_cred_tfidf: f64,
    pub neg_cred_tfidf: f64,
    pub delta_cred_tf_idf: f64,
}

/// One row of the bootstrap score table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapScore {
    pub term: String,
    pub mean: f64,
    pub std: f64,
    #[serde(rename = "p-value")]
    pub p_value: f64,
    #[serde(rename = "z-score")]
    pub z_score: f64,
}

/// Intermediate credibility statistics, per term unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct Credibility {
    /// Occurrences in the positive group (C_i_pos)
    pub pos_counts: Array1<f64>,
    /// Occurrences in the negative group (C_i_neg)
    pub neg_counts: Array1<f64>,
    /// Unshrunk self-credibility: (C_pos^2 + C_neg^2) / C^2
    pub s_hat_i: Array1<f64>,
    /// Count-weighted mean of `s_hat_i` over the vocabulary
    pub s_hat: f64,
    /// Self-credibility shrunk toward `s_hat`
    pub s_bar_i: Array1<f64>,
}

struct GroupMeans {
    pos: Array1<f64>,
    neg: Array1<f64>,
}

#[derive(Debug, Clone)]
pub struct CredTfIdf {
    terms: Vec<String>,
    /// documents_pos x terms
    positive: Array2<f64>,
    /// documents_neg x terms
    negative: Array2<f64>,
    /// Additive smoothing strength for the credibility shrinkage
    eta: f64,
    /// Use log(count + 0.5) instead of raw counts
    use_sublinear: bool,
}

impl CredTfIdf {
    /// Build a scorer over two document groups sharing the vocabulary `terms`.
    ///
    /// Terms that never occur in either group are dropped, so every retained
    /// term has a nonzero total count and document frequency. Retained terms
    /// keep their vocabulary order.
    pub fn new(split: GroupSplit, terms: &[String]) -> Result<Self> {
        let GroupSplit { positive, negative } = split;
        let groups = [
            ("positive group columns", &positive),
            ("negative group columns", &negative),
        ];
        for (what, group) in groups {
            if group.ncols() != terms.len() {
                return Err(ScatterError::ShapeMismatch {
                    what,
                    expected: terms.len(),
                    found: group.ncols(),
                });
            }
        }
        if positive.nrows() == 0 {
            return Err(ScatterError::EmptyGroup("positive"));
        }
        if negative.nrows() == 0 {
            return Err(ScatterError::EmptyGroup("negative"));
        }

        let totals = positive.sum_axis(Axis(0)) + negative.sum_axis(Axis(0));
        let keep: Vec<usize> = totals
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0.0)
            .map(|(i, _)| i)
            .collect();

        let (terms, positive, negative) = if keep.len() == terms.len() {
            (terms.to_vec(), positive, negative)
        } else {
            debug!(
                dropped = terms.len() - keep.len(),
                kept = keep.len(),
                "Dropping terms absent from both groups"
            );
            (
                keep.iter().map(|&i| terms[i].clone()).collect(),
                positive.select(Axis(1), &keep),
                negative.select(Axis(1), &keep),
            )
        };

        Ok(Self {
            terms,
            positive,
            negative,
            eta: 1.0,
            use_sublinear: true,
        })
    }

    pub fn with_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    pub fn with_sublinear(mut self, use_sublinear: bool) -> Self {
        self.use_sublinear = use_sublinear;
        self
    }

    /// The scored vocabulary, in the order of every output table.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn use_sublinear(&self) -> bool {
        self.use_sublinear
    }

    /// Credibility statistics for the unresampled groups.
    pub fn credibility(&self) -> Credibility {
        credibility(&self.positive, &self.negative, self.eta)
    }

    /// Full score table: positive mean, negative mean and their difference.
    pub fn score_df(&self) -> Vec<CredScore> {
        let means = self.group_means(&self.positive, &self.negative, &self.idf());
        self.terms
            .iter()
            .zip(means.pos.iter().zip(means.neg.iter()))
            .map(|(term, (&pos, &neg))| CredScore {
                term: term.clone(),
                pos_cred_tfidf: pos,
                neg_cred_tfidf: neg,
                delta_cred_tf_idf: pos - neg,
            })
            .collect()
    }

    /// Experimental: bootstrap the delta score.
    ///
    /// Each resample draws documents with replacement within each group and
    /// adds 1 to every count before scoring. IDF is taken from the unresampled
    /// groups. The per-term mean, sample standard
    /// deviation, P(delta > 0) under a normal approximation, and mean/std are
    /// reported. These statistics have not been validated against a reference
    /// and should be treated as indicative only.
    ///
    /// Every resample materializes two full dense matrices, so cost grows as
    /// `num_bootstraps x documents x terms`. `on_resample` is called after each
    /// resample with its zero-based index.
    pub fn bootstrap_score_df<R, F>(
        &self,
        num_bootstraps: usize,
        rng: &mut R,
        mut on_resample: F,
    ) -> Vec<BootstrapScore>
    where
        R: Rng + ?Sized,
        F: FnMut(usize),
    {
        info!(
            num_bootstraps,
            terms = self.terms.len(),
            "Running experimental cred-tf-idf bootstrap"
        );

        let idf = self.idf();
        let mut stats = vec![RunningStats::new(); self.terms.len()];
        for b in 0..num_bootstraps {
            let pos = resample_with_laplace(&self.positive, rng);
            let neg = resample_with_laplace(&self.negative, rng);
            let means = self.group_means(&pos, &neg, &idf);
            let deltas = &means.pos - &means.neg;
            for (acc, &delta) in stats.iter_mut().zip(deltas.iter()) {
                acc.push(delta);
            }
            on_resample(b);
        }

        self.terms
            .iter()
            .zip(&stats)
            .map(|(term, acc)| {
                let mean = acc.mean();
                let std = acc.standard_deviation();
                BootstrapScore {
                    term: term.clone(),
                    mean,
                    std,
                    p_value: normal_sf(0.0, mean, std),
                    z_score: mean / std,
                }
            })
            .collect()
    }

    /// log(N / df) over both groups pooled.
    fn idf(&self) -> Array1<f64> {
        let n_docs = (self.positive.nrows() + self.negative.nrows()) as f64;
        let df = document_frequency(&self.positive) + document_frequency(&self.negative);
        df.mapv(|d| (n_docs / d).ln())
    }

    fn group_means(
        &self,
        positive: &Array2<f64>,
        negative: &Array2<f64>,
        idf: &Array1<f64>,
    ) -> GroupMeans {
        let cred = credibility(positive, negative, self.eta);
        let coef = cred.s_bar_i.mapv(|s| 0.5 + s);
        let term_weight = &coef * idf;

        GroupMeans {
            pos: normalized_mean(&self.adjusted_tf(positive), &term_weight),
            neg: normalized_mean(&self.adjusted_tf(negative), &term_weight),
        }
    }

    fn adjusted_tf(&self, counts: &Array2<f64>) -> Array2<f64> {
        if self.use_sublinear {
            counts.mapv(|c| (c + 0.5).ln())
        } else {
            counts.clone()
        }
    }
}

impl TermScorer for CredTfIdf {
    fn name(&self) -> &'static str {
        "Delta mean cred-tf-idf"
    }

    fn terms(&self) -> &[String] {
        &self.terms
    }

    fn scores(&self) -> Array1<f64> {
        self.score_df()
            .into_iter()
            .map(|row| row.delta_cred_tf_idf)
            .collect()
    }
}

fn credibility(positive: &Array2<f64>, negative: &Array2<f64>, eta: f64) -> Credibility {
    let pos_counts = positive.sum_axis(Axis(0));
    let neg_counts = negative.sum_axis(Axis(0));
    let total = &pos_counts + &neg_counts;

    let squares = pos_counts.mapv(|c| c * c) + neg_counts.mapv(|c| c * c);
    let total_sq = total.mapv(|c| c * c);

    let s_hat_i = &squares / &total_sq;
    let s_hat = (&s_hat_i * &total).sum() / total.sum();
    let s_bar_i = (&squares + s_hat * eta) / (&total_sq + eta);

    Credibility {
        pos_counts,
        neg_counts,
        s_hat_i,
        s_hat,
        s_bar_i,
    }
}

/// Number of documents in which each term occurs at least once.
fn document_frequency(counts: &Array2<f64>) -> Array1<f64> {
    counts
        .mapv(|c| if c > 0.0 { 1.0 } else { 0.0 })
        .sum_axis(Axis(0))
}

/// Weight each document's terms, L2-normalize per document, then average
/// over documents. A document whose weights are all zero normalizes to NaN.
fn normalized_mean(tf: &Array2<f64>, term_weight: &Array1<f64>) -> Array1<f64> {
    let weights = tf * term_weight;
    let norms = weights.map_axis(Axis(1), |row| row.dot(&row).sqrt());
    let normalized = &weights / &norms.insert_axis(Axis(1));
    normalized
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::from_elem(term_weight.len(), f64::NAN))
}

fn resample_with_laplace<R: Rng + ?Sized>(counts: &Array2<f64>, rng: &mut R) -> Array2<f64> {
    let n = counts.nrows();
    let rows: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
    let mut sample = counts.select(Axis(0), &rows);
    sample.mapv_inplace(|c| c + 1.0);
    sample
}
