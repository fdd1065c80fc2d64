//! Timestamp normalization.
//!
//! Tools record time in several shapes: RFC 3339 strings, SQLite-style
//! `YYYY-MM-DD HH:MM:SS[.fff]` strings (UTC), and epoch numbers in either
//! seconds or milliseconds.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Epoch values above this are treated as milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Converts an epoch number (seconds or milliseconds) to UTC.
pub fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value > MILLIS_THRESHOLD {
        Utc.timestamp_millis_opt(value).single()
    } else {
        Utc.timestamp_opt(value, 0).single()
    }
}

/// Parses a timestamp string.
pub fn from_str(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    // Some tools store epoch numbers as strings.
    value.parse::<i64>().ok().and_then(from_epoch)
}

/// Parses a JSON timestamp that may be a number or a string.
#[allow(clippy::cast_possible_truncation)]
pub fn from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(from_epoch),
        Value::String(s) => from_str(s),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
