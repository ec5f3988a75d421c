// AMLWatch pipeline - batch transaction monitoring run
// Loads the ledger and rules, evaluates, scores, and prints a JSON summary

use analytics::DEFAULT_ANOMALY_THRESHOLD;
use anyhow::Context;
use clap::Parser;
use reporting::{RunSummary, DEFAULT_TOP_N};
use std::path::PathBuf;
use tracing::info;

/// Batch AML monitoring over a transaction ledger.
#[derive(Debug, Parser)]
#[command(name = "amlwatch", version, about)]
struct Args {
    /// Transaction ledger CSV
    #[arg(long, default_value = "data/transactions.csv")]
    transactions: PathBuf,

    /// Rules configuration YAML
    #[arg(long, default_value = "config/rules.yaml")]
    rules: PathBuf,

    /// Analyst feedback CSV (optional; missing file is skipped)
    #[arg(long, default_value = "data/feedback.csv")]
    feedback: PathBuf,

    /// Absolute z-score above which a transaction is labeled anomalous
    #[arg(long, default_value_t = DEFAULT_ANOMALY_THRESHOLD)]
    anomaly_threshold: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let summary = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<RunSummary> {
    info!(ledger = %args.transactions.display(), "starting monitoring run");

    let frame = ingest::load_transactions(&args.transactions)
        .with_context(|| format!("loading ledger {}", args.transactions.display()))?;
    let raw_rules = ingest::load_rules(&args.rules)
        .with_context(|| format!("loading rules {}", args.rules.display()))?;

    let hits = rules_engine::apply_rules_raw(&frame, Some(&raw_rules))
        .context("rule evaluation failed")?;

    let features = analytics::build_features(&frame);
    let scored = analytics::score_transactions(features, args.anomaly_threshold);
    let enriched = reporting::merge_hits(scored, &hits);

    let feedback = reporting::load_feedback_summary(&args.feedback)
        .with_context(|| format!("loading feedback {}", args.feedback.display()))?;

    Ok(reporting::generate_report(
        &enriched,
        &hits,
        feedback,
        DEFAULT_TOP_N,
    ))
}
