//! Pricing model parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Pricing model offered to the merchant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModelKind {
    InterchangePlus,
    Flat,
    Tiered,
    DualPricing,
}

impl PricingModelKind {
    pub const ALL: [PricingModelKind; 4] = [
        PricingModelKind::InterchangePlus,
        PricingModelKind::Flat,
        PricingModelKind::Tiered,
        PricingModelKind::DualPricing,
    ];

    /// Parse a model name; `None` when it is not one of the four models
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match normalized.as_str() {
            "interchange_plus" => Some(PricingModelKind::InterchangePlus),
            "flat" => Some(PricingModelKind::Flat),
            "tiered" => Some(PricingModelKind::Tiered),
            "dual_pricing" => Some(PricingModelKind::DualPricing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModelKind::InterchangePlus => "interchange_plus",
            PricingModelKind::Flat => "flat",
            PricingModelKind::Tiered => "tiered",
            PricingModelKind::DualPricing => "dual_pricing",
        }
    }
}

impl fmt::Display for PricingModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingModelKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| PricingError::UnknownModel(s.to_string()))
    }
}

/// Rate inputs for one pricing model. Percent fields are percentages (2.9 = 2.9%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PricingModelParams {
    #[serde(rename_all = "camelCase")]
    InterchangePlus {
        markup_percent: f64,
        per_transaction_fee: f64,
    },
    #[serde(rename_all = "camelCase")]
    Flat {
        rate_percent: f64,
        per_transaction_fee: f64,
    },
    #[serde(rename_all = "camelCase")]
    DualPricing {
        rate_percent: f64,
    },
    #[serde(rename_all = "camelCase")]
    Tiered {
        check_card_rate_percent: f64,
        qualified_rate_percent: f64,
        mid_qualified_rate_percent: f64,
        non_qualified_rate_percent: f64,
        per_transaction_fee: f64,
    },
}

impl PricingModelParams {
    pub fn kind(&self) -> PricingModelKind {
        match self {
            PricingModelParams::InterchangePlus { .. } => PricingModelKind::InterchangePlus,
            PricingModelParams::Flat { .. } => PricingModelKind::Flat,
            PricingModelParams::DualPricing { .. } => PricingModelKind::DualPricing,
            PricingModelParams::Tiered { .. } => PricingModelKind::Tiered,
        }
    }
}
