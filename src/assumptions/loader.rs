//! CSV-based assumption loader
//!
//! Loads pricing assumptions from CSV files in data/assumptions/

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use super::card_mix::CardMixBucket;
use super::SHARE_TOLERANCE;
use crate::error::{PricingError, Result};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

#[derive(Debug, Deserialize)]
struct CardMixRow {
    bucket: String,
    volume_share: f64,
    transaction_share: f64,
    rate: f64,
    per_transaction_fee: f64,
}

#[derive(Debug, Deserialize)]
struct ConstantRow {
    name: String,
    value: f64,
}

/// Raw assumption tables as read from disk
#[derive(Debug, Clone)]
pub struct LoadedAssumptions {
    pub card_mix: Vec<CardMixBucket>,
    pub constants: HashMap<String, f64>,
}

impl LoadedAssumptions {
    /// Load all assumption files from a directory
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self {
            card_mix: load_card_mix(path)?,
            constants: load_constants(path)?,
        })
    }

    /// Named constant, falling back to the given default when absent
    pub fn constant_or(&self, name: &str, default: f64) -> f64 {
        self.constants.get(name).copied().unwrap_or(default)
    }
}

/// Load the assumed card mix from card_mix.csv.
/// Volume and transaction shares must each sum to 1.
pub fn load_card_mix(path: &Path) -> Result<Vec<CardMixBucket>> {
    let file = File::open(path.join("card_mix.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut buckets = Vec::new();
    for result in reader.deserialize() {
        let row: CardMixRow = result?;
        buckets.push(CardMixBucket {
            name: row.bucket,
            volume_share: row.volume_share,
            transaction_share: row.transaction_share,
            rate: row.rate,
            per_transaction_fee: row.per_transaction_fee,
        });
    }

    let volume_share: f64 = buckets.iter().map(|b| b.volume_share).sum();
    let transaction_share: f64 = buckets.iter().map(|b| b.transaction_share).sum();
    if (volume_share - 1.0).abs() > SHARE_TOLERANCE {
        return Err(PricingError::InvalidAssumption(format!(
            "card mix volume shares sum to {}",
            volume_share
        )));
    }
    if (transaction_share - 1.0).abs() > SHARE_TOLERANCE {
        return Err(PricingError::InvalidAssumption(format!(
            "card mix transaction shares sum to {}",
            transaction_share
        )));
    }

    Ok(buckets)
}

/// Load named scalar constants from pricing_constants.csv
pub fn load_constants(path: &Path) -> Result<HashMap<String, f64>> {
    let file = File::open(path.join("pricing_constants.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut constants = HashMap::new();
    for result in reader.deserialize() {
        let row: ConstantRow = result?;
        constants.insert(row.name, row.value);
    }

    Ok(constants)
}
