//! Untyped values as produced by data-access code before JSON encoding.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;

use crate::instant::Instant;

/// Largest integer a JSON number carries exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    BigInt(BigInt),
    Instant(Instant),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Integers inside the safe range become numbers, everything wider a `BigInt`.
    pub fn from_integer<I: Into<i128>>(n: I) -> Value {
        let n: i128 = n.into();
        if n.unsigned_abs() <= MAX_SAFE_INTEGER as u128 {
            Value::Number(n as f64)
        } else {
            Value::BigInt(BigInt::from(n))
        }
    }

    pub fn from_u128(n: u128) -> Value {
        match i128::try_from(n) {
            Ok(n) => Value::from_integer(n),
            Err(_) => Value::BigInt(BigInt::from(n)),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Field lookup on objects, following the prototype chain.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }
}

/// A keyed mapping: own fields in insertion order plus an optional shared
/// prototype consulted by [`Object::get`] but never by own-field iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    fields: Vec<(String, Value)>,
    prototype: Option<Arc<Object>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prototype(prototype: Arc<Object>) -> Self {
        Object {
            fields: Vec::new(),
            prototype: Some(prototype),
        }
    }

    pub fn prototype(&self) -> Option<&Arc<Object>> {
        self.prototype.as_ref()
    }

    pub fn set_prototype(&mut self, prototype: Option<Arc<Object>>) {
        self.prototype = prototype;
    }

    /// Set an own field. Existing fields keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(idx).1)
    }

    /// Own field first, then the prototype chain.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut current = Some(self);
        while let Some(obj) = current {
            if let Some(v) = obj.get_own(key) {
                return Some(v);
            }
            current = obj.prototype.as_deref();
        }
        None
    }

    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_own(&self, key: &str) -> bool {
        self.get_own(key).is_some()
    }

    pub fn own_entries(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn own_fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub(crate) fn into_own_fields(self) -> Vec<(String, Value)> {
        self.fields
    }

    // Callers guarantee the keys are unique.
    pub(crate) fn from_unique_fields(fields: Vec<(String, Value)>) -> Self {
        Object {
            fields,
            prototype: None,
        }
    }
}

/// Later duplicates overwrite earlier ones in place, same as [`Object::insert`].
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut fields: Vec<(String, Value)> = Vec::with_capacity(iter.size_hint().0);
        let mut index: HashMap<String, usize> = HashMap::with_capacity(fields.capacity());
        for (k, v) in iter {
            let key = k.into();
            let value = v.into();
            match index.get(&key) {
                Some(&i) => fields[i].1 = value,
                None => {
                    index.insert(key.clone(), fields.len());
                    fields.push((key, value));
                }
            }
        }
        Object::from_unique_fields(fields)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

impl From<Instant> for Value {
    fn from(i: Instant) -> Self {
        Value::Instant(i)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::Instant(Instant::new(dt))
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        o.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_integer_switches_to_bigint_outside_safe_range() {
        assert_eq!(Value::from_integer(MAX_SAFE_INTEGER), Value::Number(MAX_SAFE_INTEGER as f64));
        assert_eq!(Value::from_integer(-MAX_SAFE_INTEGER), Value::Number(-MAX_SAFE_INTEGER as f64));
        assert_eq!(
            Value::from_integer(MAX_SAFE_INTEGER + 1),
            Value::BigInt(BigInt::from(MAX_SAFE_INTEGER + 1))
        );
        assert_eq!(Value::from_integer(i64::MIN), Value::BigInt(BigInt::from(i64::MIN)));
        assert_eq!(Value::from_u128(u128::MAX), Value::BigInt(BigInt::from(u128::MAX)));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut o: Object = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(o.insert("a", 3), Some(Value::Number(1.0)));
        assert_eq!(o.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(o.get("a"), Some(&Value::Number(3.0)));
        assert_eq!(o.remove("a"), Some(Value::Number(3.0)));
        assert_eq!(o.len(), 1);
    }

    #[test]
    fn collect_keeps_first_position_and_last_value() {
        let o: Object = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        assert_eq!(o.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(o.get("a"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn collect_wide_object() {
        let o: Object = (0..50_000).map(|i| (format!("k{i}"), i)).collect();
        assert_eq!(o.len(), 50_000);
        assert_eq!(o.keys().next(), Some("k0"));
        assert_eq!(o.get("k49999"), Some(&Value::Number(49_999.0)));
    }

    #[test]
    fn get_walks_prototype_but_own_entries_do_not() {
        let proto: Object = [("role", "member")].into_iter().collect();
        let mut o = Object::with_prototype(Arc::new(proto));
        o.insert("name", "ada");
        assert_eq!(o.get("role").and_then(Value::as_str), Some("member"));
        assert!(!o.contains_own("role"));
        assert_eq!(o.own_entries().count(), 1);
    }
}
