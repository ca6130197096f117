//! Read untyped values out of JSON that marks big integers, dates and
//! undefined with single-key tag objects:
//!
//! ```text
//! {"$bigint": "123456789012345678901234567890"}
//! {"$date": "2024-05-01T12:34:56Z"}      {"$date": 1714566896000}
//! {"$undefined": true}
//! {"$proto": {"role": "member"}, "name": "ada"}
//! ```
//!
//! Tags that do not have exactly the expected shape are kept as ordinary
//! objects. Plain integers outside the safe range become big integers.
//! A `$proto` only becomes the prototype when it holds a plain object; when
//! it holds a tag (`{"$proto": {"$bigint": "1"}}`) it stays an own field.

use std::sync::Arc;

use num_bigint::BigInt;
use serde_json::{Map, Value as JsonValue};

use crate::Result;
use crate::instant::Instant;
use crate::value::{Object, Value};

pub const BIGINT_TAG: &str = "$bigint";
pub const DATE_TAG: &str = "$date";
pub const UNDEFINED_TAG: &str = "$undefined";
pub const PROTO_TAG: &str = "$proto";

pub fn from_tagged_str(s: &str) -> Result<Value> {
    let json: JsonValue = serde_json::from_str(s)?;
    Ok(from_tagged_json(json))
}

pub fn from_tagged_json(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => number(&n),
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::Array(items.into_iter().map(from_tagged_json).collect()),
        JsonValue::Object(map) => object(map),
    }
}

fn number(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::from_integer(i);
    }
    if let Some(u) = n.as_u64() {
        return Value::from_integer(u);
    }
    Value::Number(n.as_f64().unwrap_or(f64::NAN))
}

fn object(mut map: Map<String, JsonValue>) -> Value {
    if map.len() == 1 {
        if let Some(v) = single_tag(&map) {
            return v;
        }
    }
    let mut prototype = None;
    if matches!(map.get(PROTO_TAG), Some(JsonValue::Object(p)) if !is_tag(p)) {
        if let Some(JsonValue::Object(proto)) = map.shift_remove(PROTO_TAG) {
            if let Value::Object(o) = object(proto) {
                prototype = Some(Arc::new(o));
            }
        }
    }
    // serde_json maps never repeat a key.
    let fields = map
        .into_iter()
        .map(|(k, v)| (k, from_tagged_json(v)))
        .collect();
    let mut obj = Object::from_unique_fields(fields);
    obj.set_prototype(prototype);
    Value::Object(obj)
}

fn is_tag(map: &Map<String, JsonValue>) -> bool {
    map.len() == 1 && single_tag(map).is_some()
}

fn single_tag(map: &Map<String, JsonValue>) -> Option<Value> {
    let (key, value) = map.iter().next()?;
    match (key.as_str(), value) {
        (BIGINT_TAG, JsonValue::String(s)) => s.trim().parse::<BigInt>().ok().map(Value::BigInt),
        (DATE_TAG, JsonValue::String(s)) => Some(Value::Instant(Instant::parse(s))),
        (DATE_TAG, JsonValue::Number(n)) => {
            Some(Value::Instant(Instant::from_millis(n.as_f64().unwrap_or(f64::NAN))))
        }
        (UNDEFINED_TAG, JsonValue::Bool(true)) => Some(Value::Undefined),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags() {
        assert_eq!(
            from_tagged_json(json!({"$bigint": "-98765432109876543210"})),
            Value::BigInt("-98765432109876543210".parse().unwrap())
        );
        assert_eq!(
            from_tagged_json(json!({"$date": "nope"})),
            Value::Instant(Instant::invalid())
        );
        assert_eq!(
            from_tagged_json(json!({"$date": 0})),
            Value::Instant(Instant::from_millis(0.0))
        );
        assert_eq!(from_tagged_json(json!({"$undefined": true})), Value::Undefined);
    }

    #[test]
    fn malformed_tags_stay_objects() {
        let v = from_tagged_json(json!({"$bigint": "12x"}));
        assert_eq!(v.get("$bigint"), Some(&Value::from("12x")));
        let v = from_tagged_json(json!({"$bigint": "1", "other": 2}));
        assert_eq!(v.as_object().map(Object::len), Some(2));
    }

    #[test]
    fn wide_json_integers_become_bigints() {
        assert_eq!(
            from_tagged_json(json!(9007199254740993_u64)),
            Value::BigInt(BigInt::from(9_007_199_254_740_993_u64))
        );
        assert_eq!(from_tagged_json(json!(42)), Value::from(42));
        assert_eq!(from_tagged_json(json!(0.25)), Value::Number(0.25));
    }

    #[test]
    fn proto_becomes_prototype() {
        let v = from_tagged_json(json!({"$proto": {"role": "member"}, "name": "ada"}));
        let obj = v.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), ["name"]);
        assert_eq!(obj.get("role"), Some(&Value::from("member")));
    }

    #[test]
    fn tagged_proto_stays_an_own_field() {
        let v = from_tagged_json(json!({"$proto": {"$bigint": "1"}, "a": 1}));
        let obj = v.as_object().unwrap();
        assert!(obj.prototype().is_none());
        assert_eq!(obj.keys().collect::<Vec<_>>(), ["$proto", "a"]);
        assert_eq!(obj.get_own("$proto"), Some(&Value::BigInt(BigInt::from(1))));
    }

    #[test]
    fn wide_objects_keep_every_key() {
        let map: Map<String, JsonValue> = (0..50_000).map(|i| (format!("k{i}"), json!(i))).collect();
        let v = from_tagged_json(JsonValue::Object(map));
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 50_000);
        assert_eq!(obj.keys().last(), Some("k49999"));
    }
}
