// Supervised term scoring: credibility-adjusted TF-IDF and its helpers.

pub mod cred_tfidf;
pub mod normal;
pub mod running_stats;
pub mod traits;
