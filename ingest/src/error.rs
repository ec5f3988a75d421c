//! Ingestion errors

use std::path::PathBuf;
use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestError {
    /// Ledger file does not exist
    #[error("Transaction file not found: {0}")]
    FileNotFound(PathBuf),

    /// CSV parsing failed
    #[error("Failed to read ledger: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rules document is not valid YAML
    #[error("Invalid rules document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Ledger failed engine validation
    #[error(transparent)]
    Rule(#[from] rules_engine::RuleError),
}

/// Result type
pub type Result<T> = std::result::Result<T, IngestError>;
