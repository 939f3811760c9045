//! Field-level coercion helpers for model replies.
//!
//! Replies are validated one field at a time: whatever cannot be coerced to
//! the expected type is replaced by the caller's default.

use serde_json::Value;

/// Reads a number (or numeric string) and clamps it into `[min, max]`.
///
/// Fractions are truncated toward zero after clamping. Returns `None` for
/// missing, non-numeric and non-finite values.
pub fn clamped_int(value: Option<&Value>, min: i64, max: i64) -> Option<i64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some(number.clamp(min as f64, max as f64).trunc() as i64)
}

/// Renders a scalar as text. Strings are returned as-is, `null` is `None`.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads a list of strings, dropping `null` and blank entries.
///
/// Anything other than an array yields an empty list.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(text)
            .filter(|item| !item.trim().is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalizes an enumerated string field to one of `allowed`.
pub fn one_of(value: Option<&Value>, allowed: &[&str], default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_lowercase())
        .filter(|s| allowed.contains(&s.as_str()))
        .unwrap_or_else(|| default.to_string())
}
