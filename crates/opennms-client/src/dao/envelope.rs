//! Collection envelope normalization
//!
//! OpenNMS API versions disagree on how a collection is wrapped:
//!
//! - `{"count": 0, "totalCount": 0}` (the collection key may be missing)
//! - `{"count": 1, "node": {...}}` (a single record, not wrapped in an array)
//! - `{"count": 2, "node": [{...}, {...}]}`
//! - a bare array (API v2)
//!
//! Everything downstream of this module only ever sees a `Vec` of records.

use crate::error::OnmsError;
use serde_json::Value;
use tracing::debug;

/// JSON type name used in error messages
pub fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Number of records the server claims the body holds
///
/// Reads `count`, then `totalCount`; either may be a number or a numeric
/// string. A bare number body is its own count; a missing count reads as 0.
pub fn count(body: &Value) -> Result<u64, OnmsError> {
    match body {
        Value::Null => Ok(0),
        Value::Number(_) => parse_count(body),
        Value::Object(map) => {
            let field = ["count", "totalCount"]
                .iter()
                .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
            match field {
                Some(value) => parse_count(value),
                None => {
                    debug!("response is missing count and totalCount properties");
                    Ok(0)
                }
            }
        }
        other => Err(OnmsError::MalformedResponse(format!(
            "expected a collection object but got {}",
            shape(other)
        ))),
    }
}

fn parse_count(value: &Value) -> Result<u64, OnmsError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| OnmsError::MalformedResponse(format!("invalid collection count: {value}")))
}

/// Extract the records stored under `key` in a collection envelope
///
/// A zero count always yields an empty sequence, whether or not `key` is
/// present. A single object under `key` becomes a one-element sequence; an
/// array is returned unchanged.
pub fn unwrap_collection(body: Value, key: &str) -> Result<Vec<Value>, OnmsError> {
    let count = count(&body)?;
    let Value::Object(mut map) = body else {
        return Ok(Vec::new());
    };
    if count == 0 {
        return Ok(Vec::new());
    }

    match map.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(records)) => Ok(records),
        Some(record @ Value::Object(_)) => Ok(vec![record]),
        Some(other) => Err(OnmsError::MalformedResponse(format!(
            "expected an array of {key} records but got {} instead",
            shape(&other)
        ))),
    }
}

/// Like [`unwrap_collection`], but also accepts a bare array (API v2) and an
/// empty body
pub fn unwrap_list(body: Value, key: &str) -> Result<Vec<Value>, OnmsError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => unwrap_collection(body, key),
        other => Err(OnmsError::MalformedResponse(format!(
            "expected an array of {key} records but got {} instead",
            shape(&other)
        ))),
    }
}
