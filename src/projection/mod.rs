//! Pricing projections for the four offered models

mod engine;
mod params;
mod result;
pub mod rates;

pub use engine::{NetworkVolumes, ProjectionEngine};
pub use params::{PricingModelKind, PricingModelParams};
pub use result::{MerchantSavings, ProjectionResult};
pub use rates::{current_effective_rate, volume_share, weighted_rate};
