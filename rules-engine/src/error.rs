//! Error types for the rule engine

use thiserror::Error;

/// Rule engine error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Required column absent from the transaction table
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Invalid rule definition or configuration value
    #[error("Invalid rule configuration: {0}")]
    ConfigError(String),

    /// Unrecognized operator name in a legacy rule
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// The `rules` key is present but is not a list
    #[error("Malformed rules container: {0}")]
    MalformedRules(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, RuleError>;
