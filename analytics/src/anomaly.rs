//! Anomaly scoring

use crate::features::FeatureRow;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Default labeling threshold on the absolute z-score.
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.5;

/// A feature row with its anomaly score and label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTransaction {
    pub txn_id: String,
    pub amount: Option<Decimal>,
    pub country_src: Option<String>,
    pub country_dst: Option<String>,
    pub txn_hour: Option<u32>,
    pub amount_zscore: f64,
    pub anomaly_score: f64,
    pub is_anomalous: bool,
}

/// Attach anomaly scores and labels to the feature rows.
pub fn score_transactions(features: Vec<FeatureRow>, threshold: f64) -> Vec<ScoredTransaction> {
    let scored: Vec<ScoredTransaction> = features
        .into_iter()
        .map(|row| {
            let anomaly_score = row.amount_zscore.abs();
            ScoredTransaction {
                txn_id: row.txn_id,
                amount: row.amount,
                country_src: row.country_src,
                country_dst: row.country_dst,
                txn_hour: row.txn_hour,
                amount_zscore: row.amount_zscore,
                anomaly_score,
                is_anomalous: anomaly_score >= threshold,
            }
        })
        .collect();

    debug!(
        anomalous = scored.iter().filter(|row| row.is_anomalous).count(),
        total = scored.len(),
        "anomaly scoring complete"
    );
    scored
}
