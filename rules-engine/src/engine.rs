//! Rule dispatcher and entry point
//!
//! The single interface callers use. Schema routing happened when the
//! configuration was validated into [`RuleConfig`]; this module dispatches
//! to the matching evaluator and guarantees one result shape. `RuleHit`
//! carries all six standardized columns on both paths, so an empty result
//! is just an empty vector with the same projection available.

use crate::config::RuleConfig;
use crate::detectors;
use crate::error::Result;
use crate::frame::TransactionFrame;
use crate::legacy;
use crate::types::RuleHit;
use serde_json::Value;
use tracing::info;

/// Evaluate a validated configuration against a transaction frame.
///
/// Pure and idempotent: identical inputs produce identical hit sequences.
pub fn apply_rules(frame: &TransactionFrame, config: &RuleConfig) -> Vec<RuleHit> {
    match config {
        RuleConfig::Legacy(rules) => {
            info!(rules = rules.len(), "applying legacy rule set");
            legacy::evaluate(frame, rules)
        }
        RuleConfig::Modern(modern) => detectors::run_modern(frame, modern),
    }
}

/// Evaluate a raw (possibly absent) configuration document.
///
/// Validation errors (malformed rules container, incomplete rule
/// definitions, unsupported operators) abort the evaluation with no
/// partial results.
pub fn apply_rules_raw(frame: &TransactionFrame, raw: Option<&Value>) -> Result<Vec<RuleHit>> {
    let config = RuleConfig::from_value(raw)?;
    Ok(apply_rules(frame, &config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;
    use crate::types::{FieldValue, Record};
    use serde_json::json;

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
    fn test_rules_key_routes_to_legacy() {
        let frame = frame(vec![vec![("txn_id", "T1"), ("amount", "20000")]]);
        let raw = json!({
            "rules": [
                { "id": "big", "field": "amount", "operator": "greater_than", "value": 10000 }
            ]
        });

        let hits = apply_rules_raw(&frame, Some(&raw)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rule_id, "big");
        assert!(hits[0].severity.is_none());
    }

    #[test]
    fn test_absent_config_routes_to_modern_defaults() {
        let frame = frame(vec![
            vec![("txn_id", "T1"), ("amount", "20000"), ("currency", "USD")],
            vec![("txn_id", "T2"), ("amount", "50"), ("currency", "USD")],
        ]);

        let hits = apply_rules_raw(&frame, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].rule_id, detectors::RULE_LARGE);
        assert_eq!(hits[0].severity, Some(0.6));
    }

    #[test]
    fn test_empty_result_keeps_the_schema() {
        let frame = frame(vec![vec![("txn_id", "T1"), ("amount", "5")]]);
        let hits = apply_rules_raw(&frame, None).unwrap();
        assert!(hits.is_empty());
        // The hit type itself is the schema; serialization of any hit
        // always exposes the same six columns.
        let hit = RuleHit::detector("T1".to_string(), "X", "d", 0.5, "r".to_string());
        let value = serde_json::to_value(hit).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 6);
    }

    #[test]
    fn test_config_errors_abort_with_no_partial_results() {
        let frame = frame(vec![vec![("txn_id", "T1"), ("amount", "20000")]]);
        let raw = json!({
            "rules": [
                { "id": "ok", "field": "amount", "operator": "greater_than", "value": 10 },
                { "id": "broken", "field": "amount", "operator": "sideways" }
            ]
        });

        assert!(matches!(
            apply_rules_raw(&frame, Some(&raw)),
            Err(RuleError::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let frame = frame(vec![
            vec![
                ("txn_id", "T1"),
                ("amount", "9600"),
                ("currency", "USD"),
                ("customer_id", "C1"),
                ("timestamp", "2026-03-01T10:00:00Z"),
            ],
            vec![
                ("txn_id", "T2"),
                ("amount", "9700"),
                ("currency", "USD"),
                ("customer_id", "C1"),
                ("timestamp", "2026-03-01T10:05:00Z"),
            ],
            vec![
                ("txn_id", "T3"),
                ("amount", "9800"),
                ("currency", "USD"),
                ("customer_id", "C1"),
                ("timestamp", "2026-03-01T10:10:00Z"),
            ],
        ]);

        let first = apply_rules_raw(&frame, None).unwrap();
        let second = apply_rules_raw(&frame, None).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
