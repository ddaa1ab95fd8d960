//! Recurring revenue summaries built from projected profit

use serde::{Deserialize, Serialize};

use crate::projection::ProjectionResult;

/// MRR/ARR/ARPU for one or more merchants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringRevenue {
    pub mrr: f64,
    pub arr: f64,
    pub customers: u64,
    pub arpu: f64,
}

impl RecurringRevenue {
    pub fn from_monthly(mrr: f64, customers: u64) -> Self {
        Self {
            mrr,
            arr: mrr * 12.0,
            customers,
            arpu: if customers > 0 { mrr / customers as f64 } else { 0.0 },
        }
    }

    /// Treat each projection as one signed merchant
    pub fn from_projections(results: &[ProjectionResult]) -> Self {
        let mrr = results.iter().map(|r| r.profit).sum();
        Self::from_monthly(mrr, results.len() as u64)
    }
}
