//! Normalizer: loosely-typed extraction output to [`StatementData`]
//!
//! Never fails. Unreadable numbers become 0, missing derived figures are
//! back-filled and flagged as estimated.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::classify::classify_key;
use super::coerce::{coerce_count, coerce_opt, round4};
use super::data::{CardBreakdownEntry, ProcessingMethod, StatementData, StatementFormat};

/// Raw extraction snapshot as produced by the AI collaborator.
///
/// Every field is kept as an untyped JSON value so a string where a number
/// was expected does not reject the whole statement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawExtraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_volume: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_interchange: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fees: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_transaction_rate: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_transaction_rate_estimated: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_ticket_size: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_ticket_size_estimated: Option<Value>,
    #[serde(flatten)]
    pub counts: RawCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_processing_method: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_breakdown: Option<Value>,
}

/// The several names statements use for a transaction count
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_transactions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txns: Option<Value>,
}

impl RawCounts {
    /// First positive count in priority order, else 0
    pub fn resolve(&self) -> u64 {
        [
            &self.transaction_count,
            &self.transactions,
            &self.total_transactions,
            &self.txns,
        ]
        .into_iter()
        .map(|v| coerce_count(v.as_ref()))
        .find(|&n| n > 0)
        .unwrap_or(0)
    }
}

/// One card breakdown row before normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCardEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_transaction_fee: Option<Value>,
    #[serde(flatten)]
    pub counts: RawCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_ticket_size: Option<Value>,
}

/// Normalize a raw extraction into a consistent numeric statement
pub fn normalize(raw: &RawExtraction) -> StatementData {
    let total_volume = match coerce_opt(raw.total_volume.as_ref()) {
        v if v != 0.0 => v,
        _ => coerce_opt(raw.monthly_volume.as_ref()),
    };
    let total_interchange = coerce_opt(raw.total_interchange.as_ref());
    let total_fees = coerce_opt(raw.total_fees.as_ref());
    let transaction_count = raw.counts.resolve();

    let given_ticket = coerce_opt(raw.average_ticket_size.as_ref());
    let (average_ticket_size, average_ticket_size_estimated) = if given_ticket > 0.0 {
        (given_ticket, flag(raw.average_ticket_size_estimated.as_ref()))
    } else if total_volume > 0.0 && transaction_count > 0 {
        let derived = round4(total_volume / transaction_count as f64);
        debug!("Derived average ticket {} from {} transactions", derived, transaction_count);
        (derived, true)
    } else {
        (given_ticket, false)
    };

    let given_rate = coerce_opt(raw.per_transaction_rate.as_ref());
    let (per_transaction_rate, per_transaction_rate_estimated) = if given_rate > 0.0 {
        (given_rate, flag(raw.per_transaction_rate_estimated.as_ref()))
    } else if average_ticket_size > 0.0 && total_volume > 0.0 && total_fees > 0.0 {
        let estimated_txns = total_volume / average_ticket_size;
        let derived = round4(total_fees / estimated_txns);
        debug!("Derived per-transaction rate {} from {:.1} estimated transactions", derived, estimated_txns);
        (derived, true)
    } else {
        (given_rate, false)
    };

    let card_breakdown = match &raw.card_breakdown {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| {
                let entry: RawCardEntry = serde_json::from_value(value.clone()).unwrap_or_default();
                (key.clone(), normalize_entry(key, &entry, average_ticket_size))
            })
            .collect(),
        _ => BTreeMap::new(),
    };

    let data = StatementData {
        merchant_name: text(raw.merchant_name.as_ref()).or_else(|| text(raw.restaurant_name.as_ref())),
        total_volume,
        total_interchange,
        total_fees,
        per_transaction_rate,
        per_transaction_rate_estimated,
        average_ticket_size,
        average_ticket_size_estimated,
        transaction_count,
        current_processing_method: text(raw.current_processing_method.as_ref())
            .map(|s| ProcessingMethod::from_text(&s))
            .unwrap_or(ProcessingMethod::Unknown),
        statement_format: text(raw.statement_format.as_ref())
            .map(|s| StatementFormat::from_text(&s))
            .unwrap_or(StatementFormat::Unknown),
        card_breakdown,
    };

    let breakdown_volume = data.breakdown_volume();
    if !data.card_breakdown.is_empty() && (breakdown_volume - data.total_volume).abs() > 0.01 {
        debug!(
            "Card breakdown volume {:.2} differs from total volume {:.2}",
            breakdown_volume, data.total_volume
        );
    }
    data
}

fn normalize_entry(key: &str, raw: &RawCardEntry, statement_ticket: f64) -> CardBreakdownEntry {
    let volume = coerce_opt(raw.volume.as_ref());
    let count = raw.counts.resolve();

    let given_ticket = coerce_opt(raw.average_ticket_size.as_ref());
    let average_ticket_size = if given_ticket > 0.0 {
        given_ticket
    } else if count > 0 && volume > 0.0 {
        round4(volume / count as f64)
    } else {
        statement_ticket
    };

    CardBreakdownEntry {
        key: key.to_string(),
        network: classify_key(key),
        volume,
        rate: coerce_opt(raw.rate.as_ref()),
        per_transaction_fee: coerce_opt(raw.per_transaction_fee.as_ref()),
        transaction_count: (count > 0).then_some(count),
        average_ticket_size,
    }
}

fn flag(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

impl From<&StatementData> for RawExtraction {
    fn from(data: &StatementData) -> Self {
        let breakdown: serde_json::Map<String, Value> = data
            .card_breakdown
            .iter()
            .map(|(key, entry)| {
                let raw = RawCardEntry {
                    volume: Some(entry.volume.into()),
                    rate: Some(entry.rate.into()),
                    per_transaction_fee: Some(entry.per_transaction_fee.into()),
                    counts: RawCounts {
                        transaction_count: entry.transaction_count.map(Value::from),
                        ..Default::default()
                    },
                    average_ticket_size: Some(entry.average_ticket_size.into()),
                };
                (key.clone(), serde_json::to_value(raw).unwrap_or(Value::Null))
            })
            .collect();

        let method = serde_json::to_value(data.current_processing_method).ok();
        let format = serde_json::to_value(data.statement_format).ok();

        RawExtraction {
            merchant_name: data.merchant_name.clone().map(Value::from),
            total_volume: Some(data.total_volume.into()),
            total_interchange: Some(data.total_interchange.into()),
            total_fees: Some(data.total_fees.into()),
            per_transaction_rate: Some(data.per_transaction_rate.into()),
            per_transaction_rate_estimated: Some(data.per_transaction_rate_estimated.into()),
            average_ticket_size: Some(data.average_ticket_size.into()),
            average_ticket_size_estimated: Some(data.average_ticket_size_estimated.into()),
            counts: RawCounts {
                transaction_count: Some(data.transaction_count.into()),
                ..Default::default()
            },
            current_processing_method: method,
            statement_format: format,
            card_breakdown: Some(Value::Object(breakdown)),
            ..Default::default()
        }
    }
}

impl StatementData {
    /// Run an already-normalized statement back through the normalizer
    pub fn renormalize(&self) -> StatementData {
        normalize(&RawExtraction::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::CardNetwork;
    use serde_json::json;

    fn raw(value: Value) -> RawExtraction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_average_ticket_back_fill() {
        let data = normalize(&raw(json!({
            "totalVolume": 90000,
            "transactionCount": 2000,
        })));
        assert_eq!(data.average_ticket_size, 45.0);
        assert!(data.average_ticket_size_estimated);
    }

    #[test]
    fn test_given_ticket_not_estimated() {
        let data = normalize(&raw(json!({
            "totalVolume": 90000,
            "transactionCount": 2000,
            "averageTicketSize": "$38.50",
        })));
        assert_eq!(data.average_ticket_size, 38.5);
        assert!(!data.average_ticket_size_estimated);
    }

    #[test]
    fn test_transaction_count_priority() {
        let data = normalize(&raw(json!({ "transactions": 10, "totalTransactions": 20, "txns": 30 })));
        assert_eq!(data.transaction_count, 10);

        let data = normalize(&raw(json!({ "transactionCount": "N/A", "totalTransactions": 20, "txns": 30 })));
        assert_eq!(data.transaction_count, 20);

        let data = normalize(&raw(json!({ "txns": "1,500" })));
        assert_eq!(data.transaction_count, 1500);

        let data = normalize(&raw(json!({})));
        assert_eq!(data.transaction_count, 0);
    }

    #[test]
    fn test_per_transaction_rate_estimate() {
        // 100000 / 50 = 2000 transactions, 3000 / 2000 = 1.5
        let data = normalize(&raw(json!({
            "totalVolume": "100,000.00",
            "totalFees": 3000,
            "averageTicketSize": 50,
        })));
        assert_eq!(data.per_transaction_rate, 1.5);
        assert!(data.per_transaction_rate_estimated);
    }

    #[test]
    fn test_per_transaction_rate_left_alone_without_inputs() {
        let data = normalize(&raw(json!({ "totalVolume": 100000, "totalFees": 3000 })));
        assert_eq!(data.per_transaction_rate, 0.0);
        assert!(!data.per_transaction_rate_estimated);
    }

    #[test]
    fn test_card_entries() {
        let data = normalize(&raw(json!({
            "totalVolume": 20000,
            "transactionCount": 400,
            "cardBreakdown": {
                "visa": { "volume": "12,000", "rate": 0.0275, "perTransactionFee": "$0.10", "transactionCount": 300 },
                "amex_keyed": { "volume": 8000, "rate": "0.035" },
                "garbage": "not an object",
            }
        })));

        let visa = &data.card_breakdown["visa"];
        assert_eq!(visa.network, CardNetwork::Visa);
        assert_eq!(visa.volume, 12000.0);
        assert_eq!(visa.per_transaction_fee, 0.10);
        assert_eq!(visa.transaction_count, Some(300));
        assert_eq!(visa.average_ticket_size, 40.0);

        let amex = &data.card_breakdown["amex_keyed"];
        assert_eq!(amex.network, CardNetwork::Amex);
        assert_eq!(amex.rate, 0.035);
        assert_eq!(amex.transaction_count, None);
        // Falls back to statement level: 20000 / 400
        assert_eq!(amex.average_ticket_size, 50.0);

        let garbage = &data.card_breakdown["garbage"];
        assert_eq!(garbage.network, CardNetwork::Unknown);
        assert_eq!(garbage.volume, 0.0);
    }

    #[test]
    fn test_free_text_enums_and_aliases() {
        let data = normalize(&raw(json!({
            "restaurantName": "  Joe's Diner ",
            "monthlyVolume": 5000,
            "currentProcessingMethod": "Tiered pricing",
            "statementFormat": "Bundled with Amex",
        })));
        assert_eq!(data.merchant_name.as_deref(), Some("Joe's Diner"));
        assert_eq!(data.total_volume, 5000.0);
        assert_eq!(data.current_processing_method, ProcessingMethod::Tiered);
        assert_eq!(data.statement_format, StatementFormat::BundledWithAmex);
    }

    #[test]
    fn test_wrong_types_degrade_to_zero() {
        let data = normalize(&raw(json!({
            "totalVolume": [1, 2],
            "totalFees": { "amount": 3 },
            "cardBreakdown": "visa",
        })));
        assert_eq!(data.total_volume, 0.0);
        assert_eq!(data.total_fees, 0.0);
        assert!(data.card_breakdown.is_empty());
    }

    #[test]
    fn test_renormalize_is_noop() {
        let data = normalize(&raw(json!({
            "merchantName": "Cafe",
            "totalVolume": 90000,
            "totalInterchange": 1500,
            "totalFees": 2600,
            "txns": 2000,
            "currentProcessingMethod": "flat",
            "statementFormat": "card split",
            "cardBreakdown": {
                "visa": { "volume": 60000, "rate": 0.027, "transactions": 1300 },
                "mastercard": { "volume": 20000, "rate": 0.028 },
                "discover": { "volume": 10000, "rate": 0.03 }
            }
        })));
        assert!(data.average_ticket_size_estimated);
        assert!(data.per_transaction_rate_estimated);

        let again = data.renormalize();
        assert_eq!(again, data);
        assert_eq!(again.renormalize(), data);
    }
}
