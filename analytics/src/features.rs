//! Feature engineering over the transaction frame

use chrono::Timelike;
use rules_engine::TransactionFrame;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// One transaction with engineered features attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub txn_id: String,
    pub amount: Option<Decimal>,
    pub country_src: Option<String>,
    pub country_dst: Option<String>,
    /// Hour of day, missing when the timestamp did not parse
    pub txn_hour: Option<u32>,
    /// Population z-score of the amount; 0.0 when undefined
    pub amount_zscore: f64,
}

/// Engineer features for downstream scoring.
///
/// The z-score uses the population standard deviation over rows with a
/// numeric amount. A zero deviation (or no numeric amounts at all) makes
/// every score 0.0 rather than dividing by zero.
pub fn build_features(frame: &TransactionFrame) -> Vec<FeatureRow> {
    let amounts: Vec<f64> = frame
        .rows()
        .iter()
        .filter_map(|txn| txn.amount.and_then(|a| a.to_f64()))
        .collect();

    let (mean, std) = if amounts.is_empty() {
        (0.0, 0.0)
    } else {
        let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;
        let variance = amounts
            .iter()
            .map(|amount| (amount - mean).powi(2))
            .sum::<f64>()
            / amounts.len() as f64;
        (mean, variance.sqrt())
    };

    frame
        .rows()
        .iter()
        .map(|txn| {
            let amount_zscore = match txn.amount.and_then(|a| a.to_f64()) {
                Some(amount) if std > 0.0 => (amount - mean) / std,
                _ => 0.0,
            };
            FeatureRow {
                txn_id: txn.txn_id.clone(),
                amount: txn.amount,
                country_src: txn.country_src.clone(),
                country_dst: txn.country_dst.clone(),
                txn_hour: txn.timestamp.map(|ts| ts.hour()),
                amount_zscore,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_engine::{FieldValue, Record};

    fn frame(rows: Vec<Vec<(&str, &str)>>) -> TransactionFrame {
        let records: Vec<Record> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.to_string(), FieldValue::Text(v.to_string())))
                    .collect()
            })
            .collect();
        TransactionFrame::from_records(records).unwrap()
    }

    #[test]
    fn test_hour_extraction() {
        let rows = build_features(&frame(vec![
            vec![("txn_id", "T1"), ("timestamp", "2026-03-01T14:30:00Z")],
            vec![("txn_id", "T2"), ("timestamp", "bogus")],
        ]));
        assert_eq!(rows[0].txn_hour, Some(14));
        assert_eq!(rows[1].txn_hour, None);
    }

    #[test]
    fn test_zero_deviation_scores_zero() {
        let rows = build_features(&frame(vec![
            vec![("txn_id", "T1"), ("amount", "100")],
            vec![("txn_id", "T2"), ("amount", "100")],
            vec![("txn_id", "T3"), ("amount", "100")],
        ]));
        assert!(rows.iter().all(|row| row.amount_zscore == 0.0));
    }

    #[test]
    fn test_zscore_is_symmetric_around_mean() {
        let rows = build_features(&frame(vec![
            vec![("txn_id", "T1"), ("amount", "50")],
            vec![("txn_id", "T2"), ("amount", "150")],
        ]));
        assert!(rows[0].amount_zscore < 0.0);
        assert!(rows[1].amount_zscore > 0.0);
        assert!((rows[0].amount_zscore + rows[1].amount_zscore).abs() < 1e-9);
    }

    #[test]
    fn test_missing_amount_scores_zero() {
        let rows = build_features(&frame(vec![
            vec![("txn_id", "T1"), ("amount", "50")],
            vec![("txn_id", "T2"), ("amount", "150")],
            vec![("txn_id", "T3")],
        ]));
        assert_eq!(rows[2].amount_zscore, 0.0);
    }
}
