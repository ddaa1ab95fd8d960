//! Merchant Pricing CLI
//!
//! Reads one extraction JSON, normalizes it and prints projections for the
//! selected pricing models.

use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use serde::Serialize;

use merchant_pricing::{
    projection::{current_effective_rate, weighted_rate, MerchantSavings, PricingModelKind, PricingModelParams},
    statement::{load_extraction, load_extraction_from_reader, normalize, StatementData},
    Assumptions, CardMix, ProjectionResult, ScenarioRunner,
};

#[derive(Parser, Debug)]
#[command(name = "merchant-pricing", version, about = "Project processing costs and reseller profit from a statement extraction")]
struct Cli {
    /// Extraction JSON file (stdin when omitted)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Pricing model: interchange-plus, flat, tiered, dual-pricing or all
    #[arg(short = 'm', long, default_value = "all")]
    model: String,

    /// Directory with card_mix.csv and pricing_constants.csv
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Interchange-plus markup (%)
    #[arg(long, default_value_t = 0.25)]
    markup_percent: f64,

    /// Interchange-plus per transaction fee ($)
    #[arg(long, default_value_t = 0.10)]
    ic_per_txn_fee: f64,

    /// Flat rate (%)
    #[arg(long, default_value_t = 2.50)]
    flat_rate: f64,

    /// Flat per transaction fee ($)
    #[arg(long, default_value_t = 0.10)]
    flat_per_txn_fee: f64,

    /// Dual pricing card rate (%)
    #[arg(long, default_value_t = 3.50)]
    dual_rate: f64,

    /// Tiered check card rate (%)
    #[arg(long, default_value_t = 1.50)]
    check_card_rate: f64,

    /// Tiered qualified rate (%)
    #[arg(long, default_value_t = 2.00)]
    qualified_rate: f64,

    /// Tiered mid-qualified rate (%)
    #[arg(long, default_value_t = 2.50)]
    mid_qualified_rate: f64,

    /// Tiered non-qualified rate (%)
    #[arg(long, default_value_t = 3.50)]
    non_qualified_rate: f64,

    /// Tiered per transaction fee ($)
    #[arg(long, default_value_t = 0.10)]
    tiered_per_txn_fee: f64,

    /// Print a JSON report instead of the text summary
    #[arg(long)]
    json: bool,

    /// Also write a CSV comparison to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl Cli {
    fn params_for(&self, kind: PricingModelKind) -> PricingModelParams {
        match kind {
            PricingModelKind::InterchangePlus => PricingModelParams::InterchangePlus {
                markup_percent: self.markup_percent,
                per_transaction_fee: self.ic_per_txn_fee,
            },
            PricingModelKind::Flat => PricingModelParams::Flat {
                rate_percent: self.flat_rate,
                per_transaction_fee: self.flat_per_txn_fee,
            },
            PricingModelKind::DualPricing => PricingModelParams::DualPricing {
                rate_percent: self.dual_rate,
            },
            PricingModelKind::Tiered => PricingModelParams::Tiered {
                check_card_rate_percent: self.check_card_rate,
                qualified_rate_percent: self.qualified_rate,
                mid_qualified_rate_percent: self.mid_qualified_rate,
                non_qualified_rate_percent: self.non_qualified_rate,
                per_transaction_fee: self.tiered_per_txn_fee,
            },
        }
    }

    fn selected_models(&self) -> anyhow::Result<Vec<PricingModelKind>> {
        if self.model.eq_ignore_ascii_case("all") {
            return Ok(PricingModelKind::ALL.to_vec());
        }
        match PricingModelKind::parse(&self.model) {
            Some(kind) => Ok(vec![kind]),
            None => bail!("unknown pricing model '{}'", self.model),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    statement: &'a StatementData,
    weighted_rate_percent: f64,
    current_effective_rate_percent: f64,
    projections: Vec<ModelReport<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelReport<'a> {
    #[serde(flatten)]
    result: &'a ProjectionResult,
    savings: MerchantSavings,
    annual_profit: f64,
}

#[derive(Serialize)]
struct CsvRow {
    model: String,
    estimated_transactions: u64,
    total_cost: f64,
    effective_rate_pct: f64,
    estimated_interchange: f64,
    profit: f64,
    annual_profit: f64,
    monthly_savings: f64,
    annual_savings: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let raw = match &cli.input {
        Some(path) => load_extraction(path)
            .with_context(|| format!("failed to read extraction {}", path.display()))?,
        None => load_extraction_from_reader(BufReader::new(io::stdin()))
            .context("failed to read extraction from stdin")?,
    };
    let statement = normalize(&raw);

    let assumptions = match &cli.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("failed to load assumptions from {}", dir.display()))?,
        None => Assumptions::default_pricing(),
    };
    let runner = ScenarioRunner::with_assumptions(assumptions);

    let params: Vec<_> = cli
        .selected_models()?
        .into_iter()
        .map(|kind| cli.params_for(kind))
        .collect();
    info!("Projecting {} pricing model(s)", params.len());
    let results = runner.compare_models(&statement, &params);

    if let Some(path) = &cli.csv {
        write_csv(path, &statement, &results)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if cli.json {
        let report = Report {
            statement: &statement,
            weighted_rate_percent: weighted_rate(&statement),
            current_effective_rate_percent: current_effective_rate(&statement),
            projections: results
                .iter()
                .map(|result| ModelReport {
                    result,
                    savings: result.savings_against(statement.total_fees),
                    annual_profit: result.annual_profit(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&statement, &runner.assumptions().card_mix, &results);
    Ok(())
}

fn print_summary(statement: &StatementData, card_mix: &CardMix, results: &[ProjectionResult]) {
    println!("Statement Analysis");
    println!("==================\n");

    if let Some(name) = &statement.merchant_name {
        println!("  Merchant: {}", name);
    }
    println!("  Total Volume: ${:.2}", statement.total_volume);
    println!("  Current Method: {:?}", statement.current_processing_method);
    println!("  Total Fees: ${:.2}", statement.total_fees);
    println!("  True Effective Rate: {:.2}%", current_effective_rate(statement));
    println!("  Processing Rate: {:.2}% (weighted average of card rates)", weighted_rate(statement));
    println!(
        "  Per Transaction Rate: ${:.4}{}",
        statement.per_transaction_rate,
        if statement.per_transaction_rate_estimated { " (estimated)" } else { "" }
    );
    println!(
        "  Average Ticket: ${:.2}{}",
        statement.average_ticket_size,
        if statement.average_ticket_size_estimated { " (estimated)" } else { "" }
    );
    println!();

    println!("{:<18} {:>12} {:>9} {:>14} {:>12} {:>14} {:>14}",
        "Model", "Total Cost", "Eff Rate", "Interchange", "Profit", "Annual Profit", "Mo. Savings");
    println!("{}", "-".repeat(100));

    for result in results {
        let savings = result.savings_against(statement.total_fees);
        println!("{:<18} {:>12.2} {:>8.2}% {:>14.2} {:>12.2} {:>14.2} {:>14.2}",
            result.model.as_str(),
            result.total_cost,
            result.effective_rate_percent,
            result.estimated_interchange,
            result.profit,
            result.annual_profit(),
            savings.monthly,
        );
    }

    let mix: Vec<String> = card_mix
        .buckets()
        .iter()
        .map(|b| format!("{:.0}% {} ({:.2}% + ${:.2})", b.volume_share * 100.0, b.name, b.rate * 100.0, b.per_transaction_fee))
        .collect();
    println!("\n*Interchange estimate based on card mix: {}", mix.join(", "));

    for result in results {
        println!("\n{} breakdown:", result.model);
        for (component, amount) in &result.breakdown {
            println!("  {:<16} ${:.2}", component, amount);
        }
        if let Some(tiers) = &result.tier_volumes {
            for (tier, volume) in tiers {
                println!("  {:<16} volume ${:.2}", tier, volume);
            }
        }
    }
}

fn write_csv(path: &Path, statement: &StatementData, results: &[ProjectionResult]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        let savings = result.savings_against(statement.total_fees);
        writer.serialize(CsvRow {
            model: result.model.to_string(),
            estimated_transactions: result.estimated_transactions,
            total_cost: result.total_cost,
            effective_rate_pct: result.effective_rate_percent,
            estimated_interchange: result.estimated_interchange,
            profit: result.profit,
            annual_profit: result.annual_profit(),
            monthly_savings: savings.monthly,
            annual_savings: savings.annual,
        })?;
    }
    writer.flush()?;
    info!("Comparison written to {}", path.display());
    Ok(())
}
