//! Projection output structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::params::PricingModelKind;

/// Projected monthly cost and reseller profit under one pricing model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub model: PricingModelKind,

    /// Transactions implied by the benchmark ticket size
    pub estimated_transactions: u64,

    /// New monthly cost to the merchant
    pub total_cost: f64,

    /// Total cost over total volume, as a percentage
    pub effective_rate_percent: f64,

    /// Benchmark interchange paid to the card networks
    pub estimated_interchange: f64,

    /// Reseller's monthly margin
    pub profit: f64,

    /// Cost components, keyed by component name
    pub breakdown: BTreeMap<String, f64>,

    /// Volume per tier (tiered model only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_volumes: Option<BTreeMap<String, f64>>,
}

impl ProjectionResult {
    pub fn new(model: PricingModelKind, estimated_transactions: u64) -> Self {
        Self {
            model,
            estimated_transactions,
            total_cost: 0.0,
            effective_rate_percent: 0.0,
            estimated_interchange: 0.0,
            profit: 0.0,
            breakdown: BTreeMap::new(),
            tier_volumes: None,
        }
    }

    /// Add a cost component
    pub fn add_component(&mut self, name: &str, amount: f64) {
        self.breakdown.insert(name.to_string(), amount);
    }

    /// Add a tier volume
    pub fn add_tier_volume(&mut self, name: &str, volume: f64) {
        self.tier_volumes
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), volume);
    }

    pub fn annual_profit(&self) -> f64 {
        self.profit * 12.0
    }

    /// Merchant savings against what they pay today
    pub fn savings_against(&self, current_fees: f64) -> MerchantSavings {
        let monthly = current_fees - self.total_cost;
        MerchantSavings {
            monthly,
            annual: monthly * 12.0,
        }
    }
}

/// Savings to the merchant from switching (negative when the new cost is higher)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSavings {
    pub monthly: f64,
    pub annual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_and_annual_profit() {
        let mut result = ProjectionResult::new(PricingModelKind::Flat, 1111);
        result.total_cost = 1783.3;
        result.profit = 500.0;

        let savings = result.savings_against(2000.0);
        assert!((savings.monthly - 216.7).abs() < 1e-9);
        assert!((savings.annual - 2600.4).abs() < 1e-9);
        assert_eq!(result.annual_profit(), 6000.0);

        // Higher new cost shows as negative savings
        assert!(result.savings_against(1000.0).monthly < 0.0);
    }

    #[test]
    fn test_tier_volumes_only_when_added() {
        let mut result = ProjectionResult::new(PricingModelKind::Tiered, 0);
        assert!(result.tier_volumes.is_none());
        result.add_tier_volume("checkCard", 10.0);
        assert_eq!(result.tier_volumes.as_ref().unwrap()["checkCard"], 10.0);
    }
}
