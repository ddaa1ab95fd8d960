//! Merchant Pricing - statement normalization and pricing projection engine
//!
//! This library provides:
//! - Normalization of AI-extracted processing statements into numeric data
//! - Benchmark interchange estimation from an assumed card mix
//! - Cost, effective rate and reseller profit for interchange-plus, flat,
//!   tiered and dual pricing
//! - Blended rate aggregation and recurring revenue summaries

pub mod error;
pub mod statement;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod revenue;

// Re-export commonly used types
pub use error::{PricingError, Result};
pub use statement::{normalize, RawExtraction, StatementData, CardBreakdownEntry, CardNetwork};
pub use assumptions::{Assumptions, CardMix, InterchangeEstimate};
pub use projection::{ProjectionEngine, ProjectionResult, PricingModelKind, PricingModelParams, weighted_rate};
pub use scenario::ScenarioRunner;
pub use revenue::RecurringRevenue;
