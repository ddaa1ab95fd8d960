//! Pricing model calculator
//!
//! Every model is a pure function of the normalized statement, the model's
//! rate inputs and the engine assumptions.

use log::debug;

use super::params::{PricingModelKind, PricingModelParams};
use super::result::ProjectionResult;
use crate::assumptions::{Assumptions, InterchangeEstimate};
use crate::statement::{CardNetwork, StatementData};

/// Statement volume grouped the way tiered pricing buckets it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkVolumes {
    pub visa_mc: f64,
    pub amex: f64,
    pub discover: f64,
    /// True when no breakdown row could be classified and the fixed split was used
    pub assumed: bool,
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions
    pub fn new(assumptions: Assumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Project by model name.
    ///
    /// Returns `None` when the name is not a known model or does not match
    /// the variant of `params`; there is nothing to show in either case.
    pub fn project(
        &self,
        statement: &StatementData,
        model_type: &str,
        params: &PricingModelParams,
    ) -> Option<ProjectionResult> {
        let Some(kind) = PricingModelKind::parse(model_type) else {
            debug!("Unrecognized pricing model {:?}", model_type);
            return None;
        };
        if kind != params.kind() {
            debug!("Model {} does not match {} parameters", kind, params.kind());
            return None;
        }
        Some(self.project_params(statement, params))
    }

    /// Project the model described by `params`
    pub fn project_params(&self, statement: &StatementData, params: &PricingModelParams) -> ProjectionResult {
        let volume = statement.total_volume;
        let est_txns = self.assumptions.estimated_transactions(volume);
        let interchange = self.assumptions.card_mix.estimate(volume, est_txns);

        let mut result = ProjectionResult::new(params.kind(), est_txns);
        result.estimated_interchange = interchange.total_interchange_cost;

        match *params {
            PricingModelParams::InterchangePlus { markup_percent, per_transaction_fee } => {
                self.interchange_plus(statement, markup_percent, per_transaction_fee, &mut result)
            }
            PricingModelParams::Flat { rate_percent, per_transaction_fee } => {
                self.flat(statement, rate_percent, per_transaction_fee, &interchange, &mut result)
            }
            PricingModelParams::DualPricing { rate_percent } => {
                self.dual_pricing(statement, rate_percent, &interchange, &mut result)
            }
            PricingModelParams::Tiered {
                check_card_rate_percent,
                qualified_rate_percent,
                mid_qualified_rate_percent,
                non_qualified_rate_percent,
                per_transaction_fee,
            } => self.tiered(
                statement,
                [
                    check_card_rate_percent,
                    qualified_rate_percent,
                    mid_qualified_rate_percent,
                    non_qualified_rate_percent,
                ],
                per_transaction_fee,
                &interchange,
                &mut result,
            ),
        }

        result
    }

    /// Interchange passed through at cost; margin is markup plus per-item fee
    fn interchange_plus(
        &self,
        statement: &StatementData,
        markup_percent: f64,
        per_transaction_fee: f64,
        result: &mut ProjectionResult,
    ) {
        let volume = statement.total_volume;
        let markup_cost = volume * (markup_percent / 100.0);
        let transaction_fee_cost = per_transaction_fee * result.estimated_transactions as f64;
        let total_cost = statement.total_interchange + markup_cost + transaction_fee_cost;

        result.total_cost = total_cost;
        result.effective_rate_percent = effective_rate(total_cost, volume);
        result.profit = markup_cost + transaction_fee_cost;
        result.add_component("interchange", statement.total_interchange);
        result.add_component("markup", markup_cost);
        result.add_component("transactionFees", transaction_fee_cost);
    }

    fn flat(
        &self,
        statement: &StatementData,
        rate_percent: f64,
        per_transaction_fee: f64,
        interchange: &InterchangeEstimate,
        result: &mut ProjectionResult,
    ) {
        let volume = statement.total_volume;
        let rate_cost = volume * (rate_percent / 100.0);
        let transaction_fee_cost = per_transaction_fee * result.estimated_transactions as f64;
        let total_cost = rate_cost + transaction_fee_cost;

        result.total_cost = total_cost;
        result.effective_rate_percent = effective_rate(total_cost, volume);
        result.profit = total_cost - interchange.total_interchange_cost;
        result.add_component("rateCost", rate_cost);
        result.add_component("transactionFees", transaction_fee_cost);
    }

    /// Card acceptance cost folded into a single quoted rate, no per-item fee
    fn dual_pricing(
        &self,
        statement: &StatementData,
        rate_percent: f64,
        interchange: &InterchangeEstimate,
        result: &mut ProjectionResult,
    ) {
        let volume = statement.total_volume;
        let total_cost = volume * (rate_percent / 100.0);

        result.total_cost = total_cost;
        result.effective_rate_percent = if volume > 0.0 { rate_percent } else { 0.0 };
        result.profit = total_cost - interchange.total_interchange_cost;
        result.add_component("cardRate", total_cost);
    }

    /// `rates` are percentages in tier order: check card, qualified, mid, non-qualified
    fn tiered(
        &self,
        statement: &StatementData,
        rates: [f64; 4],
        per_transaction_fee: f64,
        interchange: &InterchangeEstimate,
        result: &mut ProjectionResult,
    ) {
        let volume = statement.total_volume;
        let networks = self.network_volumes(statement);
        if networks.assumed {
            debug!("No classifiable card rows; using assumed network split");
        }

        let (check_card, qualified, mid_qualified, visa_mc_non_qualified) =
            self.assumptions.tiers.split(networks.visa_mc);
        let non_qualified = visa_mc_non_qualified + networks.amex + networks.discover;

        let tiers = [
            ("checkCard", check_card),
            ("qualified", qualified),
            ("midQualified", mid_qualified),
            ("nonQualified", non_qualified),
        ];

        let mut total_cost = 0.0;
        for ((name, tier_volume), rate) in tiers.into_iter().zip(rates) {
            let cost = tier_volume * (rate / 100.0);
            total_cost += cost;
            result.add_component(name, cost);
            result.add_tier_volume(name, tier_volume);
        }

        let transaction_fee_cost = per_transaction_fee * result.estimated_transactions as f64;
        total_cost += transaction_fee_cost;
        result.add_component("transactionFees", transaction_fee_cost);

        result.total_cost = total_cost;
        result.effective_rate_percent = effective_rate(total_cost, volume);
        result.profit = total_cost - interchange.total_interchange_cost;
    }

    /// Group breakdown volume by network, falling back to the fixed split
    /// of total volume when no row carries a known network
    pub fn network_volumes(&self, statement: &StatementData) -> NetworkVolumes {
        let mut visa_mc = 0.0;
        let mut amex = 0.0;
        let mut discover = 0.0;
        let mut matched = false;

        for entry in statement.card_breakdown.values() {
            match entry.network {
                CardNetwork::Visa | CardNetwork::Mastercard => visa_mc += entry.volume,
                CardNetwork::Amex => amex += entry.volume,
                CardNetwork::Discover => discover += entry.volume,
                CardNetwork::Unknown => continue,
            }
            matched = true;
        }

        if matched {
            return NetworkVolumes { visa_mc, amex, discover, assumed: false };
        }

        let (visa_mc, amex, discover) = self.assumptions.network_fallback.apply(statement.total_volume);
        NetworkVolumes { visa_mc, amex, discover, assumed: true }
    }
}

/// Total cost as a percentage of volume; 0 when there is no volume
fn effective_rate(total_cost: f64, volume: f64) -> f64 {
    if volume > 0.0 {
        total_cost / volume * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{normalize, RawExtraction};
    use approx::assert_abs_diff_eq;
    use serde_json::json;

    fn statement(value: serde_json::Value) -> StatementData {
        let raw: RawExtraction = serde_json::from_value(value).unwrap();
        normalize(&raw)
    }

    fn tiered_params() -> PricingModelParams {
        PricingModelParams::Tiered {
            check_card_rate_percent: 1.5,
            qualified_rate_percent: 2.0,
            mid_qualified_rate_percent: 2.5,
            non_qualified_rate_percent: 3.5,
            per_transaction_fee: 0.10,
        }
    }

    fn all_params() -> Vec<PricingModelParams> {
        vec![
            PricingModelParams::InterchangePlus { markup_percent: 0.25, per_transaction_fee: 0.10 },
            PricingModelParams::Flat { rate_percent: 2.9, per_transaction_fee: 0.30 },
            PricingModelParams::DualPricing { rate_percent: 3.5 },
            tiered_params(),
        ]
    }

    #[test]
    fn test_flat_end_to_end() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({ "totalVolume": 50000 }));
        let params = PricingModelParams::Flat { rate_percent: 2.9, per_transaction_fee: 0.30 };

        let result = engine.project(&data, "flat", &params).unwrap();
        assert_eq!(result.estimated_transactions, 1111);
        assert_abs_diff_eq!(result.total_cost, 1783.30, epsilon = 1e-9);
        assert_abs_diff_eq!(result.effective_rate_percent, 3.5666, epsilon = 1e-9);
        assert_abs_diff_eq!(result.breakdown["rateCost"], 1450.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.breakdown["transactionFees"], 333.30, epsilon = 1e-9);
        assert_abs_diff_eq!(
            result.profit,
            result.total_cost - result.estimated_interchange,
            epsilon = 1e-12
        );
        assert!(result.tier_volumes.is_none());
    }

    #[test]
    fn test_interchange_plus_profit_excludes_interchange() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({ "totalVolume": 100000, "totalInterchange": 1800 }));
        let params = PricingModelParams::InterchangePlus { markup_percent: 0.25, per_transaction_fee: 0.10 };

        let result = engine.project_params(&data, &params);
        // 1800 + 250 + 0.10 * 2222
        assert_abs_diff_eq!(result.total_cost, 2272.2, epsilon = 1e-9);
        assert_abs_diff_eq!(result.profit, 472.2, epsilon = 1e-9);
        assert_abs_diff_eq!(result.effective_rate_percent, 2.2722, epsilon = 1e-9);
        assert_eq!(result.breakdown["interchange"], 1800.0);
        assert_abs_diff_eq!(result.estimated_interchange, 1968.142, epsilon = 1e-9);
    }

    #[test]
    fn test_dual_pricing() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({ "totalVolume": 100000 }));
        let result = engine.project_params(&data, &PricingModelParams::DualPricing { rate_percent: 3.5 });

        assert_abs_diff_eq!(result.total_cost, 3500.0, epsilon = 1e-9);
        assert_eq!(result.effective_rate_percent, 3.5);
        assert_abs_diff_eq!(result.profit, 3500.0 - 1968.142, epsilon = 1e-9);
        assert_eq!(result.breakdown.len(), 1);
    }

    #[test]
    fn test_tiered_with_card_split() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({
            "totalVolume": 14000,
            "cardBreakdown": {
                "visa": { "volume": 6000 },
                "mastercard": { "volume": 4000 },
                "amex_keyed": { "volume": 2500 },
                "discover": { "volume": 1500 },
            }
        }));

        let result = engine.project_params(&data, &tiered_params());
        let tiers = result.tier_volumes.as_ref().unwrap();
        assert_eq!(tiers["checkCard"], 4000.0);
        assert_eq!(tiers["qualified"], 3000.0);
        assert_eq!(tiers["midQualified"], 2000.0);
        assert_eq!(tiers["nonQualified"], 1000.0 + 2500.0 + 1500.0);
        assert_eq!(tiers.values().sum::<f64>(), 14000.0);

        // 4000*1.5% + 3000*2% + 2000*2.5% + 5000*3.5% + 0.10 * round(14000/45)
        let expected = 60.0 + 60.0 + 50.0 + 175.0 + 0.10 * 311.0;
        assert_abs_diff_eq!(result.total_cost, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_tiered_fallback_split() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({
            "totalVolume": 20000,
            "cardBreakdown": { "ebt": { "volume": 20000 } }
        }));

        let networks = engine.network_volumes(&data);
        assert!(networks.assumed);
        assert_eq!(networks.visa_mc, 15000.0);

        let result = engine.project_params(&data, &tiered_params());
        let tiers = result.tier_volumes.unwrap();
        assert_eq!(tiers["checkCard"], 6000.0);
        assert_abs_diff_eq!(tiers["nonQualified"], 1500.0 + 3000.0 + 2000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tiers.values().sum::<f64>(), 20000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bundled_statement_counts_as_visa_mc() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({
            "totalVolume": 10000,
            "statementFormat": "bundled_with_amex",
            "cardBreakdown": {
                "visa_mastercard_discover": { "volume": 8000 },
                "amex": { "volume": 2000 },
            }
        }));
        let networks = engine.network_volumes(&data);
        assert!(!networks.assumed);
        assert_eq!(networks.visa_mc, 8000.0);
        assert_eq!(networks.amex, 2000.0);
        assert_eq!(networks.discover, 0.0);
    }

    #[test]
    fn test_zero_volume_is_safe() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({ "totalVolume": "N/A", "totalInterchange": 10 }));

        for params in all_params() {
            let result = engine.project_params(&data, &params);
            assert_eq!(result.effective_rate_percent, 0.0, "{}", params.kind());
            assert_eq!(result.estimated_transactions, 0);
            assert!(result.total_cost.is_finite());
            assert!(result.profit.is_finite());
            assert!(result.breakdown.values().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_unknown_or_mismatched_model_is_none() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({ "totalVolume": 1000 }));
        let params = PricingModelParams::DualPricing { rate_percent: 3.0 };

        assert!(engine.project(&data, "surcharge", &params).is_none());
        assert!(engine.project(&data, "flat", &params).is_none());
        assert!(engine.project(&data, "dual_pricing", &params).is_some());
    }

    #[test]
    fn test_projection_is_deterministic() {
        let engine = ProjectionEngine::default();
        let data = statement(json!({
            "totalVolume": "87,654.32",
            "totalInterchange": 1500.5,
            "cardBreakdown": { "visa": { "volume": 50000 }, "amex": { "volume": 37654.32 } }
        }));
        for params in all_params() {
            let a = engine.project_params(&data, &params);
            let b = engine.project_params(&data, &params);
            assert_eq!(a, b);
            assert_eq!(a.total_cost.to_bits(), b.total_cost.to_bits());
        }
    }
}
