//! Operator library for generic field rules
//!
//! Every legacy rule names one of these predicates by string. Parsing is
//! case-insensitive and happens once at configuration validation, so the
//! evaluator itself can never see an unknown operator.

use crate::error::{Result, RuleError};
use crate::types::FieldValue;
use rust_decimal::Decimal;
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;

/// Comparison predicate applicable to a column of cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
}

impl Operator {
    /// Parse an operator name, accepting the documented aliases.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "greater_than" => Ok(Operator::GreaterThan),
            "greater_than_or_equal" => Ok(Operator::GreaterThanOrEqual),
            "less_than" => Ok(Operator::LessThan),
            "less_than_or_equal" => Ok(Operator::LessThanOrEqual),
            "equals" | "equal" => Ok(Operator::Equals),
            "not_equals" | "not_equal" => Ok(Operator::NotEquals),
            "in" => Ok(Operator::In),
            "not_in" | "nin" => Ok(Operator::NotIn),
            "contains" => Ok(Operator::Contains),
            "starts_with" => Ok(Operator::StartsWith),
            "ends_with" => Ok(Operator::EndsWith),
            _ => Err(RuleError::UnsupportedOperator(name.to_string())),
        }
    }

    /// Apply the predicate to one cell against the rule's comparison value.
    ///
    /// Missing cells and failed coercions never match positive operators;
    /// the negated forms match by negation, so `not_equals`/`not_in` hold
    /// on an all-missing column.
    pub fn matches(&self, cell: &FieldValue, target: &Value) -> bool {
        match self {
            Operator::GreaterThan => compare(cell, target, |ord| ord == Ordering::Greater),
            Operator::GreaterThanOrEqual => compare(cell, target, |ord| ord != Ordering::Less),
            Operator::LessThan => compare(cell, target, |ord| ord == Ordering::Less),
            Operator::LessThanOrEqual => compare(cell, target, |ord| ord != Ordering::Greater),
            Operator::Equals => equals(cell, target),
            Operator::NotEquals => !equals(cell, target),
            Operator::In => is_member(cell, target),
            Operator::NotIn => !is_member(cell, target),
            Operator::Contains => text_test(cell, target, |haystack, needle| {
                haystack.contains(needle)
            }),
            Operator::StartsWith => text_test(cell, target, |haystack, needle| {
                haystack.starts_with(needle)
            }),
            Operator::EndsWith => text_test(cell, target, |haystack, needle| {
                haystack.ends_with(needle)
            }),
        }
    }
}

fn compare(cell: &FieldValue, target: &Value, accept: fn(Ordering) -> bool) -> bool {
    // A non-numeric comparison value disables the rule for every row.
    let Some(target) = target_number(target) else {
        return false;
    };
    match cell.as_number() {
        Some(value) => accept(value.cmp(&target)),
        None => false,
    }
}

fn equals(cell: &FieldValue, target: &Value) -> bool {
    if cell.is_missing() || target.is_null() {
        return false;
    }
    if let (Some(a), Some(b)) = (cell.as_number(), target_number(target)) {
        return a == b;
    }
    match (cell.as_text(), target_text(target)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn is_member(cell: &FieldValue, target: &Value) -> bool {
    // A scalar comparison value is a single-element set.
    match target {
        Value::Array(values) => values.iter().any(|value| equals(cell, value)),
        scalar => equals(cell, scalar),
    }
}

fn text_test(cell: &FieldValue, target: &Value, test: fn(&str, &str) -> bool) -> bool {
    let (Some(cell_text), Some(target_text)) = (cell.as_text(), target_text(target)) else {
        return false;
    };
    test(
        &cell_text.to_lowercase(),
        &target_text.to_lowercase(),
    )
}

fn target_number(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

fn target_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
