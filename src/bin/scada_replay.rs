//! SCADA Data Replay
//!
//! Feeds a SCADA CSV export through the full DriftOps pipeline:
//! Ingestion → Feature Extractor → Scenario Classifier → Recommendations.
//!
//! Usage:
//!   cargo run --bin scada-replay -- data/turbine_week.csv
//!   cargo run --bin scada-replay -- data/turbine_week.csv --config wt07.toml --tail 3

use anyhow::{Context, Result};
use clap::Parser;
use driftops_core::{AnalysisSession, ScenarioResult, TurbineConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "scada-replay",
    about = "Replay a SCADA CSV export through the DriftOps classifier"
)]
struct Args {
    /// Path to the SCADA CSV export (22-column header)
    file: PathBuf,

    /// Turbine config TOML; defaults to the standard search order
    /// ($DRIFTOPS_CONFIG, ./turbine_config.toml, built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the last N results as JSON
    #[arg(long, default_value_t = 1)]
    tail: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TurbineConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TurbineConfig::load(),
    };

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  DriftOps  ·  SCADA Data Replay                          ║");
    println!("║  Ingest → Features → Classifier → Recommendations        ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    println!("[1/3] Reading {} ...", args.file.display());
    let raw = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    println!("[2/3] Analyzing batch (turbine: {}) ...", config.turbine.name);
    let session = AnalysisSession::new(Arc::new(config));
    let results = session.submit_batch(&raw)?;

    println!("[3/3] Done. {} records classified.", results.len());
    println!();
    print_distribution(&results);

    if args.tail > 0 {
        println!();
        println!("=== Most recent {} result(s) ===", args.tail.min(results.len()));
        let skip = results.len().saturating_sub(args.tail);
        for result in &results[skip..] {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    }

    Ok(())
}

fn print_distribution(results: &[ScenarioResult]) {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for result in results {
        *counts.entry(result.scenario.to_string()).or_insert(0) += 1;
    }

    println!("=== Scenario distribution ===");
    for (scenario, count) in &counts {
        println!(
            "  {:<28} {:>6}  ({:.1}%)",
            scenario,
            count,
            *count as f64 / results.len() as f64 * 100.0
        );
    }

    if let Some(last) = results.last() {
        println!();
        println!(
            "Latest state: {} (confidence {:.0}%)",
            last.scenario,
            last.confidence * 100.0
        );
        for rec in &last.recommendations {
            println!("  • {rec}");
        }
    }
}
