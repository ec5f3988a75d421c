//! Reporting errors

use thiserror::Error;

/// Reporting error
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Feedback CSV parsing failed
    #[error("Failed to read feedback: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, ReportError>;
