//! Ledger and configuration ingestion
//!
//! Loads the transaction ledger from CSV into a validated
//! [`rules_engine::TransactionFrame`] and the rules document from YAML into
//! a raw configuration value. The engine itself never touches files; this
//! crate is the boundary that does.

pub mod error;
pub mod ledger;
pub mod rules;

pub use error::{IngestError, Result};
pub use ledger::load_transactions;
pub use rules::load_rules;
