//! Run one pricing offer across a directory of statement extractions
//!
//! Outputs one CSV row per statement plus a portfolio revenue summary.
//!
//! Usage: run_batch --dir extractions/ --params '{"model":"flat","ratePercent":2.9,"perTransactionFee":0.3}'

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::warn;
use serde::Serialize;

use merchant_pricing::{
    projection::weighted_rate,
    statement::load_statement,
    Assumptions, PricingModelParams, RecurringRevenue, ScenarioRunner, StatementData,
};

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Project one pricing offer across many statements")]
struct Args {
    /// Directory of *.json extraction files
    #[arg(long)]
    dir: PathBuf,

    /// Pricing model parameters as JSON
    #[arg(long)]
    params: String,

    /// Directory with card_mix.csv and pricing_constants.csv
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "batch_projection_output.csv")]
    output: PathBuf,
}

#[derive(Serialize)]
struct BatchRow<'a> {
    file: &'a str,
    merchant: &'a str,
    total_volume: f64,
    current_fees: f64,
    weighted_rate_pct: f64,
    total_cost: f64,
    effective_rate_pct: f64,
    estimated_interchange: f64,
    profit: f64,
    monthly_savings: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params: PricingModelParams =
        serde_json::from_str(&args.params).context("invalid --params JSON")?;
    let assumptions = match &args.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)?,
        None => Assumptions::default_pricing(),
    };
    let runner = ScenarioRunner::with_assumptions(assumptions);

    let start = Instant::now();
    println!("Loading extractions from {}...", args.dir.display());

    let mut paths: Vec<PathBuf> = fs::read_dir(&args.dir)
        .with_context(|| format!("failed to list {}", args.dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut files = Vec::new();
    let mut statements: Vec<StatementData> = Vec::new();
    for path in &paths {
        match load_statement(path) {
            Ok(statement) => {
                files.push(path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default());
                statements.push(statement);
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    println!("Loaded {} statements in {:?}", statements.len(), start.elapsed());

    let proj_start = Instant::now();
    let results = runner.run_batch(&statements, &params);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    for ((file, statement), result) in files.iter().zip(&statements).zip(&results) {
        writer.serialize(BatchRow {
            file,
            merchant: statement.merchant_name.as_deref().unwrap_or(""),
            total_volume: statement.total_volume,
            current_fees: statement.total_fees,
            weighted_rate_pct: weighted_rate(statement),
            total_cost: result.total_cost,
            effective_rate_pct: result.effective_rate_percent,
            estimated_interchange: result.estimated_interchange,
            profit: result.profit,
            monthly_savings: result.savings_against(statement.total_fees).monthly,
        })?;
    }
    writer.flush()?;
    println!("Output written to {}", args.output.display());

    let revenue = RecurringRevenue::from_projections(&results);
    println!("\nPortfolio Summary ({}):", params.kind());
    println!("  Merchants: {}", revenue.customers);
    println!("  MRR: ${:.2}", revenue.mrr);
    println!("  ARR: ${:.2}", revenue.arr);
    println!("  ARPU: ${:.2}", revenue.arpu);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
