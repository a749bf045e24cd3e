//! Typed field access over one raw JSON record
//!
//! This is the only place that looks inside untyped `serde_json::Value`
//! records. Absent and `null` fields read as `None`; a present field of the
//! wrong shape is a [`OnmsError::MalformedResponse`].

use super::envelope::shape;
use crate::error::OnmsError;
use crate::models::CodedEnum;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::str::FromStr;

pub(crate) struct Record<'a> {
    kind: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    pub(crate) fn new(kind: &'static str, value: &'a Value) -> Result<Self, OnmsError> {
        match value {
            Value::Object(fields) => Ok(Self { kind, fields }),
            other => Err(OnmsError::MalformedResponse(format!(
                "expected a {kind} object but got {}",
                shape(other)
            ))),
        }
    }

    fn malformed(&self, name: &str, detail: impl std::fmt::Display) -> OnmsError {
        OnmsError::MalformedResponse(format!("{}.{}: {}", self.kind, name, detail))
    }

    /// Field value, treating `null` as absent
    pub(crate) fn get(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// Server-assigned identifier (required)
    pub(crate) fn id(&self) -> Result<u64, OnmsError> {
        self.number("id")?
            .ok_or_else(|| self.malformed("id", "missing identifier"))
    }

    pub(crate) fn string(&self, name: &str) -> Result<Option<String>, OnmsError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(self.malformed(name, format!("expected a string, got {}", shape(other)))),
        }
    }

    /// First of several alternative spellings that is present
    pub(crate) fn first_string(&self, names: &[&str]) -> Result<Option<String>, OnmsError> {
        for name in names {
            if let Some(value) = self.string(name)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// String field where `""` means absent
    pub(crate) fn non_empty_string(&self, name: &str) -> Result<Option<String>, OnmsError> {
        Ok(self.string(name)?.filter(|s| !s.is_empty()))
    }

    /// Numeric field; numeric strings are coerced
    pub(crate) fn number<T: FromStr>(&self, name: &str) -> Result<Option<T>, OnmsError> {
        let raw = match self.get(name) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => {
                return Err(self.malformed(name, format!("expected a number, got {}", shape(other))));
            }
        };
        raw.parse()
            .map(Some)
            .map_err(|_| self.malformed(name, format!("not a valid number: {raw:?}")))
    }

    pub(crate) fn boolean(&self, name: &str) -> Result<Option<bool>, OnmsError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(other) => Err(self.malformed(name, format!("expected a boolean, got {other}"))),
        }
    }

    /// Epoch milliseconds (number or numeric string) or an ISO-8601 string
    pub(crate) fn timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>, OnmsError> {
        let parsed = match self.get(name) {
            None => return Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            Some(Value::String(s)) => parse_timestamp(s),
            Some(other) => {
                return Err(self.malformed(name, format!("expected a timestamp, got {}", shape(other))));
            }
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.malformed(name, "unrecognized timestamp"))
    }

    /// Coded enumeration field resolved through the type's lookup table
    pub(crate) fn code<E: CodedEnum>(&self, name: &str) -> Result<Option<E>, OnmsError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => E::from_code(s).map(Some),
            Some(Value::Number(n)) => E::from_code(&n.to_string()).map(Some),
            Some(other) => Err(self.malformed(name, format!("expected a code, got {}", shape(other)))),
        }
    }

    /// Embedded single-valued object
    pub(crate) fn nested(&self, kind: &'static str, name: &str) -> Result<Option<Record<'a>>, OnmsError> {
        self.get(name).map(|value| Record::new(kind, value)).transpose()
    }

    /// Array field; absent reads as empty
    pub(crate) fn array(&self, name: &str) -> Result<&'a [Value], OnmsError> {
        match self.get(name) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(self.malformed(name, format!("expected an array, got {}", shape(other)))),
        }
    }

    pub(crate) fn string_list(&self, name: &str) -> Result<Option<Vec<String>>, OnmsError> {
        if self.get(name).is_none() {
            return Ok(None);
        }
        self.array(name)?
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(self.malformed(name, format!("expected strings, got {}", shape(other)))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Scalar entries rendered as strings; nulls and nested values are skipped
    pub(crate) fn scalar_entries(&self) -> impl Iterator<Item = (String, String)> + 'a {
        self.fields.iter().filter_map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), rendered))
        })
    }
}

/// Parse epoch milliseconds or an ISO-8601 timestamp
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    // OpenNMS also emits offsets without a colon, e.g. 2017-11-07T10:35:51.123-0500
    ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"]
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}
