//! Core types for the rule engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A raw input row: column name to cell value, before normalization.
pub type Record = BTreeMap<String, FieldValue>;

/// A single cell value in the transaction table.
///
/// Cells carry whatever the ingestion layer handed over; coercion to a
/// numeric or textual view happens at comparison time, and a failed
/// coercion is a non-match rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric cell
    Number(Decimal),
    /// Boolean cell
    Bool(bool),
    /// Textual cell
    Text(String),
    /// Absent or empty cell
    Missing,
}

impl FieldValue {
    /// Whether the cell is absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Numeric view of the cell, if it coerces.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Bool(b) => Some(if *b { Decimal::ONE } else { Decimal::ZERO }),
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .ok()
            }
            FieldValue::Missing => None,
        }
    }

    /// Textual view of the cell, if present.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Missing => None,
        }
    }

    /// Boolean view of the cell, if it coerces.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Number(n) => Some(!n.is_zero()),
            FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Some(true),
                "false" | "f" | "no" | "n" | "0" => Some(false),
                _ => None,
            },
            FieldValue::Missing => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Missing => write!(f, ""),
        }
    }
}

/// One validated, normalized transaction row.
///
/// Optional columns absent from the input stay `None` and degrade to
/// non-matches in the detectors; `kyc_verified` and `pep_flag` carry their
/// documented defaults. Columns outside the standard set are kept in
/// `extra` so generic rules can still reference them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Join key for downstream merge; required
    pub txn_id: String,
    /// Parsed event time; `None` when missing or unparseable
    pub timestamp: Option<DateTime<Utc>>,
    /// Transaction amount
    pub amount: Option<Decimal>,
    /// Currency code, upper-cased
    pub currency: Option<String>,
    /// Customer identifier
    pub customer_id: Option<String>,
    /// Source country, upper-cased
    pub country_src: Option<String>,
    /// Destination country, upper-cased
    pub country_dst: Option<String>,
    /// Payment channel, lower-cased
    pub channel: Option<String>,
    /// KYC status; defaults to verified when absent
    pub kyc_verified: bool,
    /// PEP watchlist flag; defaults to false when absent
    pub pep_flag: bool,
    /// Non-standard columns carried through for generic rules
    pub extra: BTreeMap<String, FieldValue>,
}

impl Transaction {
    /// Column accessor used by the legacy evaluator.
    ///
    /// Unknown field names behave as an all-missing column.
    pub fn field(&self, name: &str) -> FieldValue {
        match name {
            "txn_id" => FieldValue::Text(self.txn_id.clone()),
            "timestamp" => self
                .timestamp
                .map(|ts| FieldValue::Text(ts.to_rfc3339()))
                .unwrap_or(FieldValue::Missing),
            "amount" => self
                .amount
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Missing),
            "currency" => text_or_missing(&self.currency),
            "customer_id" => text_or_missing(&self.customer_id),
            "country_src" => text_or_missing(&self.country_src),
            "country_dst" => text_or_missing(&self.country_dst),
            "channel" => text_or_missing(&self.channel),
            "kyc_verified" => FieldValue::Bool(self.kyc_verified),
            "pep_flag" => FieldValue::Bool(self.pep_flag),
            other => self
                .extra
                .get(other)
                .cloned()
                .unwrap_or(FieldValue::Missing),
        }
    }
}

fn text_or_missing(value: &Option<String>) -> FieldValue {
    value
        .as_ref()
        .map(|s| FieldValue::Text(s.clone()))
        .unwrap_or(FieldValue::Missing)
}

/// One standardized rule match.
///
/// Both evaluation paths produce this shape, so callers can always project
/// the same six columns: legacy matches carry `matched_value` and leave
/// `severity`/`reason` null, detector hits do the opposite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleHit {
    /// Flagged transaction
    pub txn_id: String,
    /// Identifier of the matching rule
    pub rule_id: String,
    /// Human-readable rule description
    pub rule_description: Option<String>,
    /// Offending field value (legacy path only)
    pub matched_value: Option<FieldValue>,
    /// Fixed severity in [0, 1] (detector path only)
    pub severity: Option<f64>,
    /// Human-readable match explanation (detector path only)
    pub reason: Option<String>,
}

impl RuleHit {
    /// Hit emitted by the legacy evaluator.
    pub fn legacy(
        txn_id: String,
        rule_id: String,
        description: Option<String>,
        matched_value: FieldValue,
    ) -> Self {
        let matched_value = if matched_value.is_missing() {
            None
        } else {
            Some(matched_value)
        };
        Self {
            txn_id,
            rule_id,
            rule_description: description,
            matched_value,
            severity: None,
            reason: None,
        }
    }

    /// Hit emitted by a specialized detector.
    pub fn detector(
        txn_id: String,
        rule_id: &str,
        description: &str,
        severity: f64,
        reason: String,
    ) -> Self {
        Self {
            txn_id,
            rule_id: rule_id.to_string(),
            rule_description: Some(description.to_string()),
            matched_value: None,
            severity: Some(severity),
            reason: Some(reason),
        }
    }
}
