//! Run summary assembly

use crate::merge::EnrichedTransaction;
use rules_engine::RuleHit;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Number of top anomalies included in the summary.
pub const DEFAULT_TOP_N: usize = 5;

/// One entry of the top-anomalies table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub txn_id: String,
    pub amount: Option<Decimal>,
    pub anomaly_score: f64,
    pub rule_alert: bool,
}

/// One entry of the alerted-transactions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertedRecord {
    pub txn_id: String,
    pub amount: Option<Decimal>,
    pub country_src: Option<String>,
    pub country_dst: Option<String>,
}

/// Serializable summary of one monitoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_transactions: usize,
    /// Total hit rows, duplicates included
    pub rule_alerts: usize,
    pub max_anomaly_score: f64,
    pub anomalies_over_threshold: usize,
    pub top_anomalies: Vec<AnomalyRecord>,
    pub alerted_transactions: Vec<AlertedRecord>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub feedback_summary: BTreeMap<String, u64>,
}

/// Assemble the run summary for downstream consumers.
pub fn generate_report(
    enriched: &[EnrichedTransaction],
    hits: &[RuleHit],
    feedback_summary: BTreeMap<String, u64>,
    top_n: usize,
) -> RunSummary {
    let max_anomaly_score = enriched
        .iter()
        .map(|row| row.scored.anomaly_score)
        .fold(0.0, f64::max);

    let mut ranked: Vec<&EnrichedTransaction> = enriched.iter().collect();
    ranked.sort_by(|a, b| {
        b.scored
            .anomaly_score
            .partial_cmp(&a.scored.anomaly_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top_anomalies = ranked
        .iter()
        .take(top_n)
        .map(|row| AnomalyRecord {
            txn_id: row.scored.txn_id.clone(),
            amount: row.scored.amount,
            anomaly_score: row.scored.anomaly_score,
            rule_alert: row.rule_alert,
        })
        .collect();

    let alerted_transactions = enriched
        .iter()
        .filter(|row| row.rule_alert)
        .map(|row| AlertedRecord {
            txn_id: row.scored.txn_id.clone(),
            amount: row.scored.amount,
            country_src: row.scored.country_src.clone(),
            country_dst: row.scored.country_dst.clone(),
        })
        .collect();

    let summary = RunSummary {
        total_transactions: enriched.len(),
        rule_alerts: hits.len(),
        max_anomaly_score,
        anomalies_over_threshold: enriched
            .iter()
            .filter(|row| row.scored.is_anomalous)
            .count(),
        top_anomalies,
        alerted_transactions,
        feedback_summary,
    };
    info!(
        transactions = summary.total_transactions,
        alerts = summary.rule_alerts,
        "run summary generated"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::ScoredTransaction;
    use rules_engine::FieldValue;
    use rust_decimal_macros::dec;

    fn enriched(txn_id: &str, score: f64, alert: bool) -> EnrichedTransaction {
        EnrichedTransaction {
            scored: ScoredTransaction {
                txn_id: txn_id.to_string(),
                amount: Some(dec!(100)),
                country_src: Some("AE".to_string()),
                country_dst: Some("IN".to_string()),
                txn_hour: Some(10),
                amount_zscore: score,
                anomaly_score: score.abs(),
                is_anomalous: score.abs() >= 2.5,
            },
            rule_alert: alert,
        }
    }

    #[test]
    fn test_summary_counts() {
        let rows = vec![
            enriched("T1", 3.0, true),
            enriched("T2", 0.1, false),
            enriched("T3", 1.0, true),
        ];
        let hits = vec![
            RuleHit::legacy("T1".to_string(), "r".to_string(), None, FieldValue::Missing),
            RuleHit::legacy("T1".to_string(), "r".to_string(), None, FieldValue::Missing),
            RuleHit::legacy("T3".to_string(), "r".to_string(), None, FieldValue::Missing),
        ];

        let summary = generate_report(&rows, &hits, BTreeMap::new(), DEFAULT_TOP_N);
        assert_eq!(summary.total_transactions, 3);
        // Hit rows are counted with multiplicity.
        assert_eq!(summary.rule_alerts, 3);
        assert_eq!(summary.max_anomaly_score, 3.0);
        assert_eq!(summary.anomalies_over_threshold, 1);
        assert_eq!(summary.alerted_transactions.len(), 2);
        assert_eq!(summary.top_anomalies[0].txn_id, "T1");
    }

    #[test]
    fn test_top_n_truncation() {
        let rows: Vec<EnrichedTransaction> = (0..10)
            .map(|i| enriched(&format!("T{}", i), i as f64 / 10.0, false))
            .collect();
        let summary = generate_report(&rows, &[], BTreeMap::new(), 5);
        assert_eq!(summary.top_anomalies.len(), 5);
        assert_eq!(summary.top_anomalies[0].txn_id, "T9");
    }

    #[test]
    fn test_empty_run() {
        let summary = generate_report(&[], &[], BTreeMap::new(), DEFAULT_TOP_N);
        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.max_anomaly_score, 0.0);
        assert!(summary.top_anomalies.is_empty());
        assert!(summary.alerted_transactions.is_empty());
    }

    #[test]
    fn test_feedback_summary_is_skipped_when_empty() {
        let summary = generate_report(&[], &[], BTreeMap::new(), DEFAULT_TOP_N);
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("feedback_summary").is_none());

        let mut feedback = BTreeMap::new();
        feedback.insert("true_positive".to_string(), 2u64);
        let summary = generate_report(&[], &[], feedback, DEFAULT_TOP_N);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["feedback_summary"]["true_positive"], 2);
    }
}
