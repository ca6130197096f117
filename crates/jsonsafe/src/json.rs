//! JSON output for untyped values.
//!
//! Encoding follows the rules a JSON encoder applies to the values it can
//! represent: `Undefined` object fields are left out, `Undefined` array slots
//! and non-finite numbers become null, and integral numbers are written
//! without a fractional part.

use std::io::Write;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::options::Options;
use crate::sanitize::sanitize_with;
use crate::value::{MAX_SAFE_INTEGER, Value};
use crate::Result;

/// Sanitize `value` and convert it to a `serde_json::Value`.
///
/// A top-level `Undefined` has no JSON form and yields `None`.
pub fn to_json(value: &Value) -> Option<JsonValue> {
    to_json_with(value, &Options::default())
}

pub fn to_json_with(value: &Value, options: &Options) -> Option<JsonValue> {
    json_from_sanitized(sanitize_with(value, options))
}

pub fn to_string(value: &Value, options: &Options) -> Result<String> {
    let sanitized = sanitize_with(value, options);
    let s = if options.pretty {
        serde_json::to_string_pretty(&sanitized)?
    } else {
        serde_json::to_string(&sanitized)?
    };
    Ok(s)
}

pub fn to_string_pretty(value: &Value) -> Result<String> {
    let options = Options {
        pretty: true,
        ..Options::default()
    };
    to_string(value, &options)
}

pub fn to_writer<W: Write>(writer: W, value: &Value, options: &Options) -> Result<()> {
    let sanitized = sanitize_with(value, options);
    if options.pretty {
        serde_json::to_writer_pretty(writer, &sanitized)?;
    } else {
        serde_json::to_writer(writer, &sanitized)?;
    }
    Ok(())
}

fn json_from_sanitized(value: Value) -> Option<JsonValue> {
    let json = match value {
        Value::Undefined => return None,
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(b),
        Value::Number(n) => json_number(n),
        Value::String(s) => JsonValue::String(s),
        Value::BigInt(n) => JsonValue::String(n.to_string()),
        Value::Instant(i) => i.to_iso_string().map_or(JsonValue::Null, JsonValue::String),
        Value::Array(items) => JsonValue::Array(
            items
                .into_iter()
                .map(|v| json_from_sanitized(v).unwrap_or(JsonValue::Null))
                .collect(),
        ),
        Value::Object(obj) => {
            let mut map = serde_json::Map::new();
            for (k, v) in obj.into_own_fields() {
                if let Some(j) = json_from_sanitized(v) {
                    map.insert(k, j);
                }
            }
            JsonValue::Object(map)
        }
    };
    Some(json)
}

fn safe_integer(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER as f64).then_some(n as i64)
}

fn json_number(n: f64) -> JsonValue {
    match safe_integer(n) {
        Some(i) => JsonValue::from(i),
        None => serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number),
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            Value::Number(n) => match safe_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::BigInt(n) => serializer.collect_str(n),
            Value::Instant(i) => i.serialize(serializer),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let len = obj.own_entries().filter(|(_, v)| !v.is_undefined()).count();
                let mut map = serializer.serialize_map(Some(len))?;
                for (k, v) in obj.own_entries().filter(|(_, v)| !v.is_undefined()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
