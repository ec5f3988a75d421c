//! Merge rule hits into the scored transaction set

use analytics::ScoredTransaction;
use rules_engine::RuleHit;
use serde::Serialize;
use std::collections::HashSet;

/// A scored transaction with its rule-alert membership flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTransaction {
    #[serde(flatten)]
    pub scored: ScoredTransaction,
    /// Whether any rule hit references this transaction
    pub rule_alert: bool,
}

/// Flag every transaction whose `txn_id` appears among the hits.
///
/// Membership only: a transaction hit by five rules (or five windows of
/// one rule) is flagged exactly once.
pub fn merge_hits(scored: Vec<ScoredTransaction>, hits: &[RuleHit]) -> Vec<EnrichedTransaction> {
    let flagged: HashSet<&str> = hits.iter().map(|hit| hit.txn_id.as_str()).collect();
    scored
        .into_iter()
        .map(|row| {
            let rule_alert = flagged.contains(row.txn_id.as_str());
            EnrichedTransaction { scored: row, rule_alert }
        })
        .collect()
}
