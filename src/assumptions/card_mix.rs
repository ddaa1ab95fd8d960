//! Assumed market card mix used to benchmark interchange cost
//!
//! The estimate ignores whatever the incumbent statement reports so the
//! reseller can see margin against a realistic interchange floor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One bucket of the assumed card mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMixBucket {
    pub name: String,
    /// Share of volume, 0-1
    pub volume_share: f64,
    /// Share of transactions, 0-1
    pub transaction_share: f64,
    /// Interchange rate as a decimal fraction
    pub rate: f64,
    /// Interchange fee per transaction
    pub per_transaction_fee: f64,
}

impl CardMixBucket {
    fn new(name: &str, share: f64, rate: f64, per_transaction_fee: f64) -> Self {
        Self {
            name: name.to_string(),
            volume_share: share,
            transaction_share: share,
            rate,
            per_transaction_fee,
        }
    }

    /// Interchange cost of this bucket's slice of the statement
    pub fn cost(&self, total_volume: f64, estimated_transactions: f64) -> f64 {
        total_volume * self.volume_share * self.rate
            + estimated_transactions * self.transaction_share * self.per_transaction_fee
    }
}

/// Benchmark interchange cost with its per-bucket breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterchangeEstimate {
    pub total_interchange_cost: f64,
    pub breakdown: BTreeMap<String, f64>,
}

/// Assumed card mix
#[derive(Debug, Clone, PartialEq)]
pub struct CardMix {
    buckets: Vec<CardMixBucket>,
}

impl CardMix {
    /// Restaurant card mix:
    /// 60% basic debit at 1.19% + $0.12,
    /// 15% basic credit at 2.35% + $0.10,
    /// 15% consumer credit at 2.50% + $0.08,
    /// 10% rewards credit at 2.80% + $0.12
    pub fn restaurant_default() -> Self {
        Self {
            buckets: vec![
                CardMixBucket::new("basicDebit", 0.60, 0.0119, 0.12),
                CardMixBucket::new("basicCredit", 0.15, 0.0235, 0.10),
                CardMixBucket::new("consumerCredit", 0.15, 0.025, 0.08),
                CardMixBucket::new("rewardsCredit", 0.10, 0.028, 0.12),
            ],
        }
    }

    /// Create from loaded CSV rows
    pub fn from_buckets(buckets: Vec<CardMixBucket>) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &[CardMixBucket] {
        &self.buckets
    }

    pub fn total_volume_share(&self) -> f64 {
        self.buckets.iter().map(|b| b.volume_share).sum()
    }

    pub fn total_transaction_share(&self) -> f64 {
        self.buckets.iter().map(|b| b.transaction_share).sum()
    }

    /// Estimate interchange for a volume and transaction count
    pub fn estimate(&self, total_volume: f64, estimated_transactions: u64) -> InterchangeEstimate {
        let txns = estimated_transactions as f64;
        let breakdown: BTreeMap<String, f64> = self
            .buckets
            .iter()
            .map(|b| (b.name.clone(), b.cost(total_volume, txns)))
            .collect();
        // Sum in bucket order so the total does not depend on map ordering
        let total_interchange_cost = self.buckets.iter().map(|b| b.cost(total_volume, txns)).sum();

        InterchangeEstimate {
            total_interchange_cost,
            breakdown,
        }
    }
}

impl Default for CardMix {
    fn default() -> Self {
        Self::restaurant_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_shares_sum_to_one() {
        let mix = CardMix::restaurant_default();
        assert_abs_diff_eq!(mix.total_volume_share(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mix.total_transaction_share(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_100k() {
        let mix = CardMix::restaurant_default();
        // round(100000 / 45) = 2222
        let estimate = mix.estimate(100_000.0, 2222);

        // 60000*0.0119 + 1333.2*0.12 = 714 + 159.984
        assert_abs_diff_eq!(estimate.breakdown["basicDebit"], 873.984, epsilon = 1e-9);
        // 15000*0.0235 + 333.3*0.10 = 352.5 + 33.33
        assert_abs_diff_eq!(estimate.breakdown["basicCredit"], 385.83, epsilon = 1e-9);
        // 15000*0.025 + 333.3*0.08 = 375 + 26.664
        assert_abs_diff_eq!(estimate.breakdown["consumerCredit"], 401.664, epsilon = 1e-9);
        // 10000*0.028 + 222.2*0.12 = 280 + 26.664
        assert_abs_diff_eq!(estimate.breakdown["rewardsCredit"], 306.664, epsilon = 1e-9);

        assert_abs_diff_eq!(estimate.total_interchange_cost, 1968.142, epsilon = 1e-9);
    }

    #[test]
    fn test_buckets_keep_declared_order() {
        let mix = CardMix::restaurant_default();
        let names: Vec<&str> = mix.buckets().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["basicDebit", "basicCredit", "consumerCredit", "rewardsCredit"]);
        assert_eq!(mix.buckets()[0].per_transaction_fee, 0.12);
    }

    #[test]
    fn test_zero_volume() {
        let estimate = CardMix::restaurant_default().estimate(0.0, 0);
        assert_eq!(estimate.total_interchange_cost, 0.0);
        assert_eq!(estimate.breakdown.len(), 4);
    }
}
