//! Run reporting
//!
//! Combines rule hits with scored transactions, aggregates analyst
//! feedback, and assembles the JSON summary the pipeline prints.

pub mod error;
pub mod feedback;
pub mod merge;
pub mod report;

pub use error::{ReportError, Result};
pub use feedback::load_feedback_summary;
pub use merge::{merge_hits, EnrichedTransaction};
pub use report::{generate_report, AlertedRecord, AnomalyRecord, RunSummary, DEFAULT_TOP_N};
