//! Legacy generic rule evaluator

use crate::config::LegacyRule;
use crate::frame::TransactionFrame;
use crate::types::RuleHit;
use tracing::debug;

/// Apply validated legacy rules to every row.
///
/// Rules were validated at the configuration boundary, so evaluation itself
/// cannot fail: a rule referencing a column the table does not have sees an
/// all-missing column and matches (or not) accordingly. Hits are appended
/// in rule order, then row order.
pub fn evaluate(frame: &TransactionFrame, rules: &[LegacyRule]) -> Vec<RuleHit> {
    let mut hits = Vec::new();
    for rule in rules {
        let before = hits.len();
        for txn in frame.rows() {
            let cell = txn.field(&rule.field);
            if rule.operator.matches(&cell, &rule.value) {
                hits.push(RuleHit::legacy(
                    txn.txn_id.clone(),
                    rule.id.clone(),
                    rule.description.clone(),
                    cell,
                ));
            }
        }
        debug!(
            rule_id = %rule.id,
            matched = hits.len() - before,
            "legacy rule evaluated"
        );
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::types::{FieldValue, Record};
    use rust_decimal_macros::dec;
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

    fn legacy_rules(raw: serde_json::Value) -> Vec<LegacyRule> {
        match RuleConfig::from_value(Some(&raw)).unwrap() {
            RuleConfig::Legacy(rules) => rules,
            RuleConfig::Modern(_) => panic!("expected legacy schema"),
        }
    }

    #[test]
    fn test_greater_than_end_to_end() {
        let frame = frame(vec![
            vec![("txn_id", "T1"), ("amount", "20000"), ("country", "US")],
            vec![("txn_id", "T2"), ("amount", "500"), ("country", "US")],
        ]);
        let rules = legacy_rules(json!({
            "rules": [{
                "id": "big",
                "field": "amount",
                "operator": "greater_than",
                "value": 10000,
                "description": "Large amount"
            }]
        }));

        let hits = evaluate(&frame, &rules);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].txn_id, "T1");
        assert_eq!(hits[0].rule_id, "big");
        assert_eq!(hits[0].matched_value, Some(FieldValue::Number(dec!(20000))));
        assert_eq!(hits[0].rule_description.as_deref(), Some("Large amount"));
        assert_eq!(hits[0].severity, None);
        assert_eq!(hits[0].reason, None);
    }

    #[test]
    fn test_unknown_field_never_matches_equality() {
        let frame = frame(vec![
            vec![("txn_id", "T1"), ("amount", "100")],
            vec![("txn_id", "T2"), ("amount", "200")],
        ]);
        let rules = legacy_rules(json!({
            "rules": [
                { "id": "eq", "field": "branch_code", "operator": "equals", "value": "X1" },
                { "id": "neq", "field": "branch_code", "operator": "not_equals", "value": "X1" }
            ]
        }));

        let hits = evaluate(&frame, &rules);
        // Equality on an all-missing column matches nothing; its negation
        // matches every row with a null matched value.
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| hit.rule_id == "neq"));
        assert!(hits.iter().all(|hit| hit.matched_value.is_none()));
    }

    #[test]
    fn test_membership_on_extra_column() {
        let frame = frame(vec![
            vec![("txn_id", "T1"), ("country", "IR")],
            vec![("txn_id", "T2"), ("country", "US")],
            vec![("txn_id", "T3")],
        ]);
        let rules = legacy_rules(json!({
            "rules": [
                { "id": "risky", "field": "country", "operator": "in", "value": ["IR", "KP"] }
            ]
        }));

        let hits = evaluate(&frame, &rules);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].txn_id, "T1");
    }

    #[test]
    fn test_rule_order_then_row_order() {
        let frame = frame(vec![
            vec![("txn_id", "T1"), ("amount", "300")],
            vec![("txn_id", "T2"), ("amount", "400")],
        ]);
        let rules = legacy_rules(json!({
            "rules": [
                { "id": "r_a", "field": "amount", "operator": "greater_than", "value": 100 },
                { "id": "r_b", "field": "amount", "operator": "less_than", "value": 350 }
            ]
        }));

        let hits = evaluate(&frame, &rules);
        let order: Vec<(&str, &str)> = hits
            .iter()
            .map(|hit| (hit.rule_id.as_str(), hit.txn_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("r_a", "T1"), ("r_a", "T2"), ("r_b", "T1")]
        );
    }
}
