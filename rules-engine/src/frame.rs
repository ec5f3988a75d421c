//! Validated transaction table

use crate::error::{Result, RuleError};
use crate::types::{Record, Transaction};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// An immutable, validated batch of transactions.
///
/// Construction is the only place the engine can fail on the data itself:
/// every row must carry a `txn_id`. All other normalization is lossy but
/// non-fatal; bad amounts and timestamps become `None` and are excluded
/// from the rules that need them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFrame {
    rows: Vec<Transaction>,
}

impl TransactionFrame {
    /// Build a frame from raw records, synthesizing defaults and
    /// normalizing case per the data model.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let rows = records
            .into_iter()
            .map(Transaction::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Wrap already-normalized rows.
    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    /// All rows in input order.
    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Transaction {
    /// Normalize one raw record into a transaction row.
    pub fn from_record(mut record: Record) -> Result<Self> {
        let txn_id = record
            .remove("txn_id")
            .and_then(|v| v.as_text())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RuleError::MissingColumn("txn_id".to_string()))?;

        let timestamp = record
            .remove("timestamp")
            .and_then(|v| v.as_text())
            .and_then(|s| parse_timestamp(&s));
        let amount = record.remove("amount").and_then(|v| v.as_number());
        let currency = take_text(&mut record, "currency").map(|s| s.to_uppercase());
        let customer_id = take_text(&mut record, "customer_id");
        let country_src = take_text(&mut record, "country_src").map(|s| s.to_uppercase());
        let country_dst = take_text(&mut record, "country_dst").map(|s| s.to_uppercase());
        let channel = take_text(&mut record, "channel").map(|s| s.to_lowercase());
        let kyc_verified = record
            .remove("kyc_verified")
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        let pep_flag = record
            .remove("pep_flag")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        // Whatever is left is a non-standard column.
        let extra = record;

        Ok(Self {
            txn_id,
            timestamp,
            amount,
            currency,
            customer_id,
            country_src,
            country_dst,
            channel,
            kyc_verified,
            pep_flag,
            extra,
        })
    }
}

fn take_text(record: &mut Record, name: &str) -> Option<String> {
    record
        .remove(name)
        .and_then(|v| v.as_text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Lenient timestamp parsing. Naive datetimes are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}
