//! Normalized statement data structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Card network tag assigned to each breakdown entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardNetwork {
    /// Visa and Mastercard share the same interchange schedule for tiering
    pub fn is_visa_mc(&self) -> bool {
        matches!(self, CardNetwork::Visa | CardNetwork::Mastercard)
    }
}

/// How the incumbent processor prices the merchant today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    InterchangePlus,
    Flat,
    Tiered,
    DualPricing,
    Unknown,
}

impl ProcessingMethod {
    /// Interpret free text from the extraction collaborator
    pub fn from_text(text: &str) -> Self {
        let squashed = squash(text);
        if squashed.contains("interchange") || squashed.contains("icplus") || squashed.contains("passthrough") {
            ProcessingMethod::InterchangePlus
        } else if squashed.contains("tier") {
            ProcessingMethod::Tiered
        } else if squashed.contains("dual") || squashed.contains("cashdiscount") || squashed.contains("surcharg") {
            ProcessingMethod::DualPricing
        } else if squashed.contains("flat") {
            ProcessingMethod::Flat
        } else {
            ProcessingMethod::Unknown
        }
    }
}

/// Layout of the card breakdown on the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementFormat {
    /// One row per network
    CardSplit,
    /// Visa/MC/Discover bundled, Amex reported separately
    BundledWithAmex,
    Unknown,
}

impl StatementFormat {
    pub fn from_text(text: &str) -> Self {
        let squashed = squash(text);
        if squashed.contains("bundled") {
            StatementFormat::BundledWithAmex
        } else if squashed.contains("split") {
            StatementFormat::CardSplit
        } else {
            StatementFormat::Unknown
        }
    }
}

/// Lowercase and drop everything that is not alphanumeric
fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// One row of the statement's card breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardBreakdownEntry {
    /// Free-form key as printed on the statement (e.g. `amex_keyed`)
    pub key: String,
    pub network: CardNetwork,
    pub volume: f64,
    /// Decimal fraction, 0.0275 = 2.75%
    pub rate: f64,
    pub per_transaction_fee: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u64>,
    /// Own ticket size, or the statement-level value when it could not be derived
    pub average_ticket_size: f64,
}

/// Fully numeric statement snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    pub total_volume: f64,
    pub total_interchange: f64,
    pub total_fees: f64,
    pub per_transaction_rate: f64,
    pub per_transaction_rate_estimated: bool,
    pub average_ticket_size: f64,
    pub average_ticket_size_estimated: bool,
    pub transaction_count: u64,
    pub current_processing_method: ProcessingMethod,
    pub statement_format: StatementFormat,
    pub card_breakdown: BTreeMap<String, CardBreakdownEntry>,
}

impl StatementData {
    /// Sum of per-card volumes (should be close to `total_volume`)
    pub fn breakdown_volume(&self) -> f64 {
        self.card_breakdown.values().map(|e| e.volume).sum()
    }
}
