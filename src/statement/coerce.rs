//! Lenient numeric coercion for extraction output
//!
//! The extraction collaborator emits numbers as JSON numbers or as display
//! strings such as `"$12,345.67"`. Anything that cannot be read becomes 0.

use serde_json::Value;

/// Coerce a loosely-typed JSON value into a finite `f64`
pub fn coerce(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => coerce_str(s),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Coerce an optional value, treating absence as 0
pub fn coerce_opt(value: Option<&Value>) -> f64 {
    value.map(coerce).unwrap_or(0.0)
}

/// Strip everything except digits, `.` and `-`, then read the leading number
pub fn coerce_str(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_number(&cleaned)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Longest prefix of the form `-?digits[.digits]`; trailing text is ignored
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_digit = false;
    let mut seen_dot = false;

    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

/// Coerce to a non-negative whole count (rounded)
pub fn coerce_count(value: Option<&Value>) -> u64 {
    let n = coerce_opt(value);
    if n <= 0.0 {
        0
    } else {
        n.round() as u64
    }
}

/// Round to 4 decimal places
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
