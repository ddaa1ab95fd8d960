//! Rate aggregation over the merchant's current statement
//!
//! Informational only: nothing here feeds a projection.

use crate::statement::{CardBreakdownEntry, StatementData};

/// Volume-weighted average of per-card rates, as a percentage
pub fn weighted_rate(statement: &StatementData) -> f64 {
    if statement.total_volume <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = statement
        .card_breakdown
        .values()
        .map(|e| e.rate * e.volume)
        .sum();
    weighted / statement.total_volume * 100.0
}

/// What the merchant actually pays today: total fees over volume, as a percentage
pub fn current_effective_rate(statement: &StatementData) -> f64 {
    if statement.total_volume <= 0.0 {
        return 0.0;
    }
    statement.total_fees / statement.total_volume * 100.0
}

/// Share of statement volume carried by one entry, as a percentage
pub fn volume_share(entry: &CardBreakdownEntry, statement: &StatementData) -> f64 {
    if statement.total_volume <= 0.0 {
        return 0.0;
    }
    entry.volume / statement.total_volume * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{normalize, RawExtraction};
    use serde_json::json;

    fn statement(value: serde_json::Value) -> StatementData {
        let raw: RawExtraction = serde_json::from_value(value).unwrap();
        normalize(&raw)
    }

    #[test]
    fn test_weighted_rate_two_cards() {
        let data = statement(json!({
            "totalVolume": 2000,
            "cardBreakdown": {
                "visa": { "volume": 1000, "rate": 0.02 },
                "mastercard": { "volume": 1000, "rate": 0.03 },
            }
        }));
        assert!((weighted_rate(&data) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_volume_rates() {
        let data = statement(json!({
            "totalFees": 100,
            "cardBreakdown": { "visa": { "volume": 1000, "rate": 0.02 } }
        }));
        assert_eq!(weighted_rate(&data), 0.0);
        assert_eq!(current_effective_rate(&data), 0.0);
        assert_eq!(volume_share(&data.card_breakdown["visa"], &data), 0.0);
    }

    #[test]
    fn test_negative_volume_rates_match_engine_guard() {
        let data = statement(json!({
            "totalVolume": "-5,000",
            "totalFees": 100,
            "cardBreakdown": { "visa": { "volume": 1000, "rate": 0.02 } }
        }));
        assert_eq!(data.total_volume, -5000.0);
        assert_eq!(weighted_rate(&data), 0.0);
        assert_eq!(current_effective_rate(&data), 0.0);
        assert_eq!(volume_share(&data.card_breakdown["visa"], &data), 0.0);

        let flat = crate::projection::PricingModelParams::Flat { rate_percent: 2.9, per_transaction_fee: 0.3 };
        let result = crate::projection::ProjectionEngine::default().project_params(&data, &flat);
        assert_eq!(result.effective_rate_percent, 0.0);
    }

    #[test]
    fn test_current_effective_rate_and_share() {
        let data = statement(json!({
            "totalVolume": 40000,
            "totalFees": 1300,
            "cardBreakdown": { "amex": { "volume": 10000 } }
        }));
        assert!((current_effective_rate(&data) - 3.25).abs() < 1e-12);
        assert!((volume_share(&data.card_breakdown["amex"], &data) - 25.0).abs() < 1e-12);
    }
}
