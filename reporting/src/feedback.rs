//! Analyst feedback aggregation

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Aggregate analyst feedback by label from a CSV file.
///
/// The file is optional: a missing or empty file, or one without a
/// `label` column, yields an empty summary rather than an error.
pub fn load_feedback_summary(path: impl AsRef<Path>) -> Result<BTreeMap<String, u64>> {
    let path = path.as_ref();
    if !path.exists() || std::fs::metadata(path)?.len() == 0 {
        return Ok(BTreeMap::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let Some(label_index) = headers.iter().position(|name| name == "label") else {
        return Ok(BTreeMap::new());
    };

    let mut counts = BTreeMap::new();
    for row in reader.records() {
        let row = row?;
        if let Some(label) = row.get(label_index) {
            let label = label.trim();
            if !label.is_empty() {
                *counts.entry(label.to_string()).or_insert(0u64) += 1;
            }
        }
    }
    debug!(labels = counts.len(), "feedback summary aggregated");
    Ok(counts)
}
