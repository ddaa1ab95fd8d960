//! Load extraction output produced by the AI collaborator
//!
//! The collaborator's reply may wrap the JSON object in markdown fences or
//! prose, so the outermost `{ ... }` span is taken as the payload.

use std::io::Read;
use std::path::Path;

use log::debug;

use super::data::StatementData;
use super::normalize::{normalize, RawExtraction};
use crate::error::{PricingError, Result};

/// Parse extraction text into a raw snapshot
pub fn parse_extraction(text: &str) -> Result<RawExtraction> {
    let start = text.find('{').ok_or(PricingError::MissingJson)?;
    let end = text.rfind('}').ok_or(PricingError::MissingJson)?;
    if end < start {
        return Err(PricingError::MissingJson);
    }
    if start > 0 || end + 1 < text.len() {
        debug!("Trimmed {} bytes of text around extraction JSON", text.len() - (end + 1 - start));
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}

/// Load an extraction from any reader
pub fn load_extraction_from_reader<R: Read>(mut reader: R) -> Result<RawExtraction> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_extraction(&text)
}

/// Load an extraction from a file
pub fn load_extraction<P: AsRef<Path>>(path: P) -> Result<RawExtraction> {
    let text = std::fs::read_to_string(path)?;
    parse_extraction(&text)
}

/// Load and normalize a statement from a file
pub fn load_statement<P: AsRef<Path>>(path: P) -> Result<StatementData> {
    Ok(normalize(&load_extraction(path)?))
}
