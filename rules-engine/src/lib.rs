//! AML rule-evaluation engine
//!
//! Evaluates a batch of financial transactions against a configurable rule
//! set and emits standardized hits for downstream review. Two configuration
//! schemas are supported: a generic field/operator rule list ("legacy") and
//! a fixed battery of specialized detectors including time-windowed
//! structuring detection ("modern"). Both paths produce the same hit shape.

#![forbid(unsafe_code)]

pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod frame;
pub mod legacy;
pub mod operators;
pub mod structuring;
pub mod types;

pub use config::{LegacyRule, ModernConfig, RuleConfig, Thresholds};
pub use engine::{apply_rules, apply_rules_raw};
pub use error::{Result, RuleError};
pub use frame::TransactionFrame;
pub use operators::Operator;
pub use types::{FieldValue, Record, RuleHit, Transaction};
