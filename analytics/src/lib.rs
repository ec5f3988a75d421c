//! Feature engineering and anomaly scoring
//!
//! Lightweight statistical enrichment of the transaction batch: a
//! population z-score over amounts and an hour-of-day feature, turned
//! into an absolute anomaly score with a labeling threshold. Runs after
//! rule evaluation and is independent of it.

pub mod anomaly;
pub mod features;

pub use anomaly::{score_transactions, ScoredTransaction, DEFAULT_ANOMALY_THRESHOLD};
pub use features::{build_features, FeatureRow};
