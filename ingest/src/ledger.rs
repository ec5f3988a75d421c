//! Transaction ledger loading

use crate::error::{IngestError, Result};
use rules_engine::{FieldValue, Record, RuleError, TransactionFrame};
use std::path::Path;
use tracing::info;

/// Load the transaction ledger from a headed CSV file.
///
/// The `txn_id` column must be present; everything else is optional and
/// degrades per the engine's data model. Empty cells become missing values.
pub fn load_transactions(path: impl AsRef<Path>) -> Result<TransactionFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if !headers.iter().any(|name| name == "txn_id") {
        return Err(RuleError::MissingColumn("txn_id".to_string()).into());
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| {
                let cell = cell.trim();
                let value = if cell.is_empty() {
                    FieldValue::Missing
                } else {
                    FieldValue::Text(cell.to_string())
                };
                (name.to_string(), value)
            })
            .collect();
        records.push(record);
    }

    let frame = TransactionFrame::from_records(records)?;
    info!(path = %path.display(), rows = frame.len(), "ledger loaded");
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_normalize() {
        let file = write_csv(
            "txn_id,timestamp,amount,currency,customer_id,channel\n\
             T1,2026-03-01T10:00:00Z,9600.50,usd,C1,CASH\n\
             T2,,,,C2,\n",
        );

        let frame = load_transactions(file.path()).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.rows()[0].amount, Some(dec!(9600.50)));
        assert_eq!(frame.rows()[0].currency.as_deref(), Some("USD"));
        assert_eq!(frame.rows()[0].channel.as_deref(), Some("cash"));
        assert!(frame.rows()[1].amount.is_none());
        assert!(frame.rows()[1].timestamp.is_none());
    }

    #[test]
    fn test_missing_txn_id_header_is_fatal() {
        let file = write_csv("amount,currency\n100,USD\n");
        assert!(matches!(
            load_transactions(file.path()),
            Err(IngestError::Rule(RuleError::MissingColumn(_)))
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        assert!(matches!(
            load_transactions("/nonexistent/ledger.csv"),
            Err(IngestError::FileNotFound(_))
        ));
    }
}
