//! Lenient Scalar Coercion
//!
//! Devices in the field send numbers both as JSON numbers and as strings.
//! Booleans and nulls are never accepted as numbers.

use serde_json::Value;

/// Longest rendering of an offending value kept in error messages
const MAX_DESCRIBE_LEN: usize = 64;

/// Finite float from a number or a numeric string
pub(crate) fn to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Integer from an integer, a float (truncated toward zero) or an integer string
pub(crate) fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Identifier from a string or a number
pub(crate) fn to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Short rendering of a value for error messages
pub(crate) fn describe(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > MAX_DESCRIBE_LEN {
        let mut cut = MAX_DESCRIBE_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
