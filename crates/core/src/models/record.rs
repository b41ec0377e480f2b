//! Lenient field access over backend JSON records
//!
//! The backend answers with either English camelCase, snake_case or
//! Portuguese field names depending on the endpoint. Every lookup takes a
//! list of candidate keys and returns the first one that is present and
//! not `null`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();

/// Borrowed view of a JSON object with alias-aware getters
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// Wrap a JSON value. Non-object values behave like an empty record.
    pub fn new(value: &'a Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self {
                fields: EMPTY.get_or_init(Map::new),
            },
        }
    }

    /// First non-null value among `keys`
    pub fn value(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| !value.is_null())
    }

    /// Nested record under the first matching key
    pub fn record(&self, keys: &[&str]) -> Option<Record<'a>> {
        match self.value(keys)? {
            value @ Value::Object(_) => Some(Record::new(value)),
            _ => None,
        }
    }

    pub fn string(&self, keys: &[&str]) -> Option<String> {
        match self.value(keys)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric field that may arrive as a JSON number or as a string,
    /// with either `.` or `,` as decimal separator.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        match self.value(keys)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_decimal(s),
            _ => None,
        }
    }

    pub fn integer(&self, keys: &[&str]) -> Option<i64> {
        match self.value(keys)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn boolean(&self, keys: &[&str]) -> Option<bool> {
        match self.value(keys)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn timestamp(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        self.value(keys)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    }
}

/// Items of a listing that is either a bare array or wrapped as
/// `{ "<key>": [...] }`. Any other shape is empty.
pub fn list_under<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    match body {
        Value::Array(items) => items,
        Value::Object(fields) => match fields.get(key) {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    }
}

/// Parse a decimal that may use a comma as separator (`"1200,50"`).
///
/// Only the first comma is treated as the separator, so grouped amounts such
/// as `"1.200,50"` are rejected instead of being read as a prefix.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.trim().replacen(',', ".", 1);
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse the timestamp formats the backend is known to emit
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
