//! Lenient conversions from row values to Rust types.
//!
//! Mappers never fail: absent or malformed values fall back to a default so
//! one bad row cannot make a whole listing unreadable.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value as Json};

use crate::value::{Row, Value};

/// Text form of a column; `""` when absent or null.
pub fn text(row: &Row, column: &str) -> String {
    opt_text(row, column).unwrap_or_default()
}

/// Text form of a column; `None` when absent or null.
pub fn opt_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::Text(s) => Some(s.clone()),
        Value::Integer(v) => Some(v.to_string()),
        Value::Real(v) => Some(v.to_string()),
        Value::Boolean(v) => Some(v.to_string()),
        Value::Blob(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Integer form of a column; `0` when absent, null or unparseable.
pub fn int(row: &Row, column: &str) -> i64 {
    match row.get(column) {
        Some(Value::Integer(v)) => *v,
        Some(Value::Boolean(v)) => i64::from(*v),
        Some(Value::Real(v)) if v.is_finite() => *v as i64,
        Some(Value::Text(s)) => parse_number(s).map_or(0, |v| v as i64),
        _ => 0,
    }
}

/// Floating-point form of a column; `0.0` when absent, null or non-finite.
pub fn float(row: &Row, column: &str) -> f64 {
    match row.get(column) {
        Some(Value::Integer(v)) => *v as f64,
        Some(Value::Real(v)) if v.is_finite() => *v,
        Some(Value::Boolean(v)) => f64::from(u8::from(*v)),
        Some(Value::Text(s)) => parse_number(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Boolean form of a column: native booleans, nonzero numbers, or the
/// strings `"true"`/`"1"` (any case). Everything else is `false`.
pub fn boolean(row: &Row, column: &str) -> bool {
    match row.get(column) {
        Some(Value::Boolean(v)) => *v,
        Some(Value::Integer(v)) => *v != 0,
        Some(Value::Real(v)) => *v != 0.0 && !v.is_nan(),
        Some(Value::Text(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        _ => false,
    }
}

/// Parse a JSON column as an object; `{}` on absence or parse failure.
pub fn json_object(row: &Row, column: &str) -> Map<String, Json> {
    match parse_json(row, column) {
        Some(Json::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Parse a JSON column as an array; `[]` on absence or parse failure.
pub fn json_array(row: &Row, column: &str) -> Vec<Json> {
    match parse_json(row, column) {
        Some(Json::Array(items)) => items,
        _ => Vec::new(),
    }
}

fn parse_json(row: &Row, column: &str) -> Option<Json> {
    match row.get(column)? {
        Value::Text(s) => serde_json::from_str(s).ok(),
        Value::Blob(bytes) => serde_json::from_slice(bytes).ok(),
        _ => None,
    }
}

/// Parse SQLite `CURRENT_TIMESTAMP` text or RFC 3339 into UTC.
pub fn timestamp(row: &Row, column: &str) -> Option<DateTime<Utc>> {
    let raw = opt_text(row, column)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(|naive| naive.and_utc())
}
