//! Rule configuration
//!
//! The raw configuration document selects one of two schemas by shape: a
//! `rules` key means the generic legacy rule list, anything else is the
//! modern detector configuration. The choice is made exactly once here, at
//! the boundary, and the rest of the engine works with the typed form.

use crate::error::{Result, RuleError};
use crate::operators::Operator;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

fn default_large_txn_usd() -> Decimal {
    Decimal::from(10_000)
}

fn default_near_threshold_band() -> Decimal {
    Decimal::from(500)
}

fn default_structuring_min_events() -> usize {
    3
}

fn default_structuring_window_minutes() -> i64 {
    60
}

fn default_pep_txn_usd() -> Decimal {
    Decimal::from(5_000)
}

/// Global detector thresholds. Any key missing from the document takes the
/// documented default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Large-transaction threshold, also the structuring reference point
    #[serde(default = "default_large_txn_usd")]
    pub large_txn_usd: Decimal,

    /// Width of the near-threshold band below the reporting threshold
    #[serde(default = "default_near_threshold_band")]
    pub near_threshold_band: Decimal,

    /// Minimum events in a window before structuring fires
    #[serde(default = "default_structuring_min_events")]
    pub structuring_min_events: usize,

    /// Structuring window length
    #[serde(default = "default_structuring_window_minutes")]
    pub structuring_window_minutes: i64,

    /// PEP review threshold
    #[serde(default = "default_pep_txn_usd")]
    pub pep_txn_usd: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_txn_usd: default_large_txn_usd(),
            near_threshold_band: default_near_threshold_band(),
            structuring_min_events: default_structuring_min_events(),
            structuring_window_minutes: default_structuring_window_minutes(),
            pep_txn_usd: default_pep_txn_usd(),
        }
    }
}

/// Normalized modern-schema configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModernConfig {
    /// Global thresholds
    pub thresholds: Thresholds,

    /// Per-currency overrides of the large-transaction threshold
    pub thresholds_per_currency: BTreeMap<String, Decimal>,

    /// Country codes considered high risk for corridor checks
    pub high_risk_countries: BTreeSet<String>,

    /// Toggle for the KYC-required detector
    pub kyc_required: bool,

    /// Toggle for the PEP-watchlist detector
    pub pep_watchlist: bool,
}

impl ModernConfig {
    /// Threshold in effect for a currency: the per-currency override when
    /// configured, otherwise the global default.
    pub fn effective_threshold(&self, currency: Option<&str>) -> Decimal {
        currency
            .and_then(|code| self.thresholds_per_currency.get(code))
            .copied()
            .unwrap_or(self.thresholds.large_txn_usd)
    }

    /// Upper-case currency and country keys so lookups line up with the
    /// normalized transaction columns.
    fn normalize(mut self) -> Self {
        self.thresholds_per_currency = self
            .thresholds_per_currency
            .into_iter()
            .map(|(code, threshold)| (code.to_uppercase(), threshold))
            .collect();
        self.high_risk_countries = self
            .high_risk_countries
            .into_iter()
            .map(|code| code.to_uppercase())
            .collect();
        self
    }
}

/// One validated generic rule definition.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRule {
    pub id: String,
    pub field: String,
    pub operator: Operator,
    pub value: Value,
    pub description: Option<String>,
}

impl LegacyRule {
    fn from_value(raw: &Value, index: usize) -> Result<Self> {
        let Some(rule) = raw.as_object() else {
            return Err(RuleError::ConfigError(format!(
                "rule #{} is not a mapping",
                index
            )));
        };

        let id = required_text(rule.get("id"))
            .ok_or_else(|| RuleError::ConfigError(format!("rule #{} is missing 'id'", index)))?;
        let field = required_text(rule.get("field")).ok_or_else(|| {
            RuleError::ConfigError(format!("rule '{}' is missing 'field'", id))
        })?;
        let operator_name = required_text(rule.get("operator")).ok_or_else(|| {
            RuleError::ConfigError(format!("rule '{}' is missing 'operator'", id))
        })?;
        let operator = Operator::parse(&operator_name)?;

        Ok(Self {
            id,
            field,
            operator,
            value: rule.get("value").cloned().unwrap_or(Value::Null),
            description: rule
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

fn required_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Discriminated rule configuration, selected once from the raw document.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleConfig {
    /// Generic `{id, field, operator, value}` rule list
    Legacy(Vec<LegacyRule>),
    /// Fixed detector battery with normalized thresholds
    Modern(ModernConfig),
}

impl RuleConfig {
    /// Validate a raw configuration value.
    ///
    /// An absent or null document is the modern schema with every default.
    /// Every legacy rule definition is validated here, before any matching
    /// runs, so a bad definition aborts the whole evaluation.
    pub fn from_value(raw: Option<&Value>) -> Result<Self> {
        let raw = match raw {
            None | Some(Value::Null) => return Ok(RuleConfig::Modern(ModernConfig::default())),
            Some(value) => value,
        };

        if let Some(rules) = raw.get("rules") {
            let list = rules.as_array().ok_or_else(|| {
                RuleError::MalformedRules("'rules' must be a list".to_string())
            })?;
            let rules = list
                .iter()
                .enumerate()
                .map(|(index, rule)| LegacyRule::from_value(rule, index))
                .collect::<Result<Vec<_>>>()?;
            return Ok(RuleConfig::Legacy(rules));
        }

        let config: ModernConfig = serde_json::from_value(raw.clone())
            .map_err(|err| RuleError::ConfigError(err.to_string()))?;
        Ok(RuleConfig::Modern(config.normalize()))
    }
}
