//! Structuring (smurfing) detector
//!
//! Finds clusters of transactions sitting just under the reporting
//! threshold for one customer and currency, close together in time. Every
//! selected transaction anchors its own window, so overlapping windows can
//! each qualify and re-emit hits for the same transaction; downstream
//! consumers treat hits as a membership set, and the duplicates are kept
//! as conservative alerting.

use crate::config::ModernConfig;
use crate::frame::TransactionFrame;
use crate::types::{RuleHit, Transaction};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Rule identifier for structuring hits.
pub const RULE_ID: &str = "R1_STRUCT";
/// Structuring severity.
pub const SEVERITY: f64 = 0.9;

const DESCRIPTION: &str = "Cluster of near-threshold transactions in a short window";

/// Run the detector over every `(customer, currency)` group.
pub fn detect(frame: &TransactionFrame, config: &ModernConfig) -> Vec<RuleHit> {
    let band = config.thresholds.near_threshold_band;
    let min_events = config.thresholds.structuring_min_events;
    let window_minutes = config.thresholds.structuring_window_minutes;
    let window = Duration::minutes(window_minutes);

    let mut groups: BTreeMap<(String, String), Vec<&Transaction>> = BTreeMap::new();
    for txn in frame.rows() {
        // No customer means no group to cluster under.
        let Some(customer) = txn.customer_id.clone() else {
            continue;
        };
        let key = (customer, txn.currency.clone().unwrap_or_default());
        groups.entry(key).or_default().push(txn);
    }

    let mut hits = Vec::new();
    for ((customer, currency), txns) in &groups {
        let threshold = config.effective_threshold(Some(currency.as_str()));
        let band_low = threshold - band;
        let band_high = threshold - Decimal::ONE;

        // Rows without a parseable timestamp are excluded from this rule.
        let mut candidates: Vec<(&Transaction, DateTime<Utc>)> = txns
            .iter()
            .filter_map(|txn| {
                let ts = txn.timestamp?;
                let amount = txn.amount?;
                (amount >= band_low && amount <= band_high).then_some((*txn, ts))
            })
            .collect();
        candidates.sort_by_key(|(_, ts)| *ts);

        for &(_, anchor_ts) in &candidates {
            let window_end = anchor_ts + window;
            let members: Vec<&(&Transaction, DateTime<Utc>)> = candidates
                .iter()
                .filter(|(_, ts)| *ts >= anchor_ts && *ts <= window_end)
                .collect();
            if members.len() < min_events {
                continue;
            }

            debug!(
                customer = %customer,
                currency = %currency,
                count = members.len(),
                "structuring window qualified"
            );
            let count = members.len();
            for (txn, _) in members {
                hits.push(RuleHit::detector(
                    txn.txn_id.clone(),
                    RULE_ID,
                    DESCRIPTION,
                    SEVERITY,
                    format!(
                        "{} near-threshold transactions within {} minutes \
                         for customer {} in {} (threshold ~{})",
                        count, window_minutes, customer, currency, threshold
                    ),
                ));
            }
        }
    }
    hits
}
