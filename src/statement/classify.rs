//! Card network classification from free-form breakdown keys
//!
//! Statements label rows inconsistently (`visa`, `VISA_CREDIT`,
//! `visa_mastercard_discover`, `amex_keyed`). This is the only place that
//! inspects those labels; everything downstream works on [`CardNetwork`].

use super::CardNetwork;

/// Classify a breakdown key by case-insensitive substring match.
///
/// Checked in order Visa, Mastercard, Amex, Discover, so a bundled
/// `visa_mastercard_discover` row lands with Visa.
pub fn classify_key(key: &str) -> CardNetwork {
    let key = key.to_ascii_lowercase();
    if key.contains("visa") {
        CardNetwork::Visa
    } else if key.contains("mastercard") {
        CardNetwork::Mastercard
    } else if key.contains("amex") {
        CardNetwork::Amex
    } else if key.contains("discover") {
        CardNetwork::Discover
    } else {
        CardNetwork::Unknown
    }
}
