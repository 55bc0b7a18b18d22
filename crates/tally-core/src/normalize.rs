//! Amount normalization for noisy model output.

use serde_json::Value;

/// Coerce a raw amount into a number.
///
/// Accepts JSON numbers as-is and strings such as `" $43.83 "`: surrounding
/// whitespace and one leading `$` are stripped before parsing. Anything that
/// does not parse to a finite number yields `None` instead of an error.
pub fn normalize_amount(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_amount_text(s),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse an amount written as text, tolerating a leading `$`.
pub fn parse_amount_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let cleaned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
