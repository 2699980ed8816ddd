//! Conversion of the provider's stringly-typed values.
//!
//! Booleans arrive as XML attributes or loosely typed JSON; a value is false
//! when absent, empty, `"0"` or `"false"`, and true otherwise. Numbers that
//! are absent or unparseable fall back to zero.

use serde_json::Value;
use std::str::FromStr;

pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

pub fn flag(value: Option<&str>) -> bool {
    value.is_some_and(is_truthy)
}

pub fn json_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => is_truthy(s),
        _ => false,
    }
}

pub fn number<T: FromStr + Default>(value: Option<&str>) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_default()
}

/// Absent, empty and zero values map to `None`.
pub fn optional_number<T: FromStr + Default + PartialEq>(value: Option<&str>) -> Option<T> {
    value
        .and_then(|v| v.trim().parse().ok())
        .filter(|n| *n != T::default())
}

pub fn optional_string(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn string(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Reads an unsigned id that may be encoded as a JSON number or numeric string.
pub fn json_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn json_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
