//! Error type for the I/O boundary of the engine
//!
//! Data-quality problems inside a statement never produce an error; they are
//! coerced to zero by the normalizer. Only loading and configuration fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No JSON object found in extraction output")]
    MissingJson,

    #[error("Invalid assumption: {0}")]
    InvalidAssumption(String),

    #[error("Unknown pricing model: {0}")]
    UnknownModel(String),
}

pub type Result<T> = std::result::Result<T, PricingError>;
