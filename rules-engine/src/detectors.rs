//! Specialized detector battery for the modern schema
//!
//! Four detectors always run: large transaction, structuring, risky
//! corridor and cross-border cash. KYC and PEP checks are gated on the
//! configuration toggles. Hits are concatenated in that order.

use crate::config::ModernConfig;
use crate::frame::TransactionFrame;
use crate::structuring;
use crate::types::{RuleHit, Transaction};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::info;

/// Large-transaction rule id.
pub const RULE_LARGE: &str = "R0_LARGE";
/// Risky-corridor rule id.
pub const RULE_CORRIDOR: &str = "R2_HIGH_RISK_CORRIDOR";
/// Cross-border-cash rule id.
pub const RULE_CASH: &str = "R3_CROSS_BORDER_CASH";
/// KYC-unverified rule id.
pub const RULE_KYC: &str = "R4_KYC_UNVERIFIED";
/// PEP rule id.
pub const RULE_PEP: &str = "R5_PEP_LARGE";

const SEVERITY_LARGE: f64 = 0.6;
const SEVERITY_CORRIDOR: f64 = 0.5;
const SEVERITY_CASH: f64 = 0.6;
const SEVERITY_KYC: f64 = 0.7;
const SEVERITY_PEP: f64 = 0.8;

/// Run the full modern battery in evaluation order.
pub fn run_modern(frame: &TransactionFrame, config: &ModernConfig) -> Vec<RuleHit> {
    let mut hits = Vec::new();
    hits.extend(large_transactions(frame, config));
    hits.extend(structuring::detect(frame, config));
    hits.extend(risky_corridors(frame, config));
    hits.extend(cross_border_cash(frame));
    if config.kyc_required {
        hits.extend(kyc_unverified(frame));
    }
    if config.pep_watchlist {
        hits.extend(pep_watchlist(frame, config));
    }
    info!(
        transactions = frame.len(),
        hits = hits.len(),
        "modern rule battery complete"
    );
    hits
}

/// Flag amounts above the effective per-currency threshold.
fn large_transactions(frame: &TransactionFrame, config: &ModernConfig) -> Vec<RuleHit> {
    let mut by_currency: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for txn in frame.rows() {
        let key = txn.currency.clone().unwrap_or_default();
        by_currency.entry(key).or_default().push(txn);
    }

    let mut hits = Vec::new();
    for (currency, txns) in &by_currency {
        let threshold = config.effective_threshold(Some(currency.as_str()));
        for txn in txns {
            let Some(amount) = txn.amount else { continue };
            if amount > threshold {
                hits.push(RuleHit::detector(
                    txn.txn_id.clone(),
                    RULE_LARGE,
                    "Amount above large-transaction threshold",
                    SEVERITY_LARGE,
                    format!(
                        "amount {} {} exceeds threshold {}",
                        amount,
                        currency_label(txn),
                        threshold
                    ),
                ));
            }
        }
    }
    hits
}

/// Flag transactions touching a configured high-risk country on either end.
fn risky_corridors(frame: &TransactionFrame, config: &ModernConfig) -> Vec<RuleHit> {
    if config.high_risk_countries.is_empty() {
        return Vec::new();
    }
    frame
        .rows()
        .iter()
        .filter(|txn| {
            let src_risky = txn
                .country_src
                .as_deref()
                .is_some_and(|code| config.high_risk_countries.contains(code));
            let dst_risky = txn
                .country_dst
                .as_deref()
                .is_some_and(|code| config.high_risk_countries.contains(code));
            src_risky || dst_risky
        })
        .map(|txn| {
            RuleHit::detector(
                txn.txn_id.clone(),
                RULE_CORRIDOR,
                "Corridor touches a high-risk country",
                SEVERITY_CORRIDOR,
                format!(
                    "corridor {} -> {} involves a high-risk country",
                    country_label(&txn.country_src),
                    country_label(&txn.country_dst)
                ),
            )
        })
        .collect()
}

/// Flag cash transactions that cross a border.
fn cross_border_cash(frame: &TransactionFrame) -> Vec<RuleHit> {
    frame
        .rows()
        .iter()
        .filter(|txn| {
            txn.channel.as_deref() == Some("cash")
                && match (&txn.country_src, &txn.country_dst) {
                    (Some(src), Some(dst)) => src != dst,
                    _ => false,
                }
        })
        .map(|txn| {
            RuleHit::detector(
                txn.txn_id.clone(),
                RULE_CASH,
                "Cash moved across a border",
                SEVERITY_CASH,
                format!(
                    "cash transaction crossing border {} -> {}",
                    country_label(&txn.country_src),
                    country_label(&txn.country_dst)
                ),
            )
        })
        .collect()
}

/// Flag customers that have not completed KYC verification.
fn kyc_unverified(frame: &TransactionFrame) -> Vec<RuleHit> {
    frame
        .rows()
        .iter()
        .filter(|txn| !txn.kyc_verified)
        .map(|txn| {
            RuleHit::detector(
                txn.txn_id.clone(),
                RULE_KYC,
                "Customer not KYC verified",
                SEVERITY_KYC,
                format!(
                    "customer {} has not completed KYC verification",
                    txn.customer_id.as_deref().unwrap_or("unknown")
                ),
            )
        })
        .collect()
}

/// Flag watchlisted PEP transactions above the review threshold.
fn pep_watchlist(frame: &TransactionFrame, config: &ModernConfig) -> Vec<RuleHit> {
    let limit = config.thresholds.pep_txn_usd;
    frame
        .rows()
        .iter()
        .filter(|txn| txn.pep_flag && txn.amount.is_some_and(|amount| amount > limit))
        .map(|txn| {
            let amount = txn.amount.unwrap_or(Decimal::ZERO);
            RuleHit::detector(
                txn.txn_id.clone(),
                RULE_PEP,
                "PEP transaction above review threshold",
                SEVERITY_PEP,
                format!("PEP transaction of {} exceeds review threshold {}", amount, limit),
            )
        })
        .collect()
}

fn currency_label(txn: &Transaction) -> &str {
    txn.currency.as_deref().unwrap_or("-")
}

fn country_label(country: &Option<String>) -> &str {
    country.as_deref().unwrap_or("-")
}
