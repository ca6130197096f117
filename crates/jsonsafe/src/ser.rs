//! Build an untyped [`Value`] from any `Serialize` type.

use serde::Serialize;
use serde::ser::*;

use crate::error::{Error, Result};
use crate::instant::{INSTANT_TOKEN, Instant};
use crate::value::{Object, Value};

pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(&mut ValueSerializer)
}

struct ValueSerializer;

impl Serializer for &mut ValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = SeqSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = MapSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }
    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from_integer(v))
    }
    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::from_u128(v))
    }
    fn serialize_f32(self, v: f32) -> Result<Value> {
        self.serialize_f64(v as f64)
    }
    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }
    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }
    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }
    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(v.iter().map(|b| Value::from_integer(*b)).collect()))
    }
    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value> {
        let inner = value.serialize(&mut *self)?;
        if name != INSTANT_TOKEN {
            return Ok(inner);
        }
        Ok(Value::Instant(match inner {
            Value::String(s) => Instant::parse(&s),
            _ => Instant::invalid(),
        }))
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value> {
        let mut obj = Object::new();
        obj.insert(variant, value.serialize(&mut ValueSerializer)?);
        Ok(Value::Object(obj))
    }
    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer> {
        Ok(SeqSerializer {
            elems: Vec::with_capacity(len.unwrap_or(0)),
            variant: None,
        })
    }
    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqSerializer> {
        self.serialize_seq(Some(len))
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqSerializer> {
        Ok(SeqSerializer {
            elems: Vec::with_capacity(len),
            variant: Some(variant),
        })
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<MapSerializer> {
        Ok(MapSerializer::new(None))
    }
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<MapSerializer> {
        Ok(MapSerializer::new(None))
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<MapSerializer> {
        Ok(MapSerializer::new(Some(variant)))
    }
}

// Wrap `inner` as `{ variant: inner }` for externally tagged enum variants.
fn tagged(variant: Option<&'static str>, inner: Value) -> Value {
    match variant {
        Some(name) => {
            let mut outer = Object::new();
            outer.insert(name, inner);
            Value::Object(outer)
        }
        None => inner,
    }
}

pub struct SeqSerializer {
    elems: Vec<Value>,
    variant: Option<&'static str>,
}

impl SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.elems.push(value.serialize(&mut ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.variant, Value::Array(self.elems)))
    }
}

impl SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Value> {
        SerializeSeq::end(self)
    }
}

impl SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Value> {
        SerializeSeq::end(self)
    }
}

impl SerializeTupleVariant for SeqSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        SerializeSeq::serialize_element(self, value)
    }
    fn end(self) -> Result<Value> {
        SerializeSeq::end(self)
    }
}

pub struct MapSerializer {
    fields: Vec<(String, Value)>,
    next_key: Option<String>,
    variant: Option<&'static str>,
}

impl MapSerializer {
    fn new(variant: Option<&'static str>) -> Self {
        MapSerializer {
            fields: Vec::new(),
            next_key: None,
            variant,
        }
    }
}

fn key_string(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::BigInt(n) => Ok(n.to_string()),
        _ => Err(Error::KeyMustBeAString),
    }
}

impl SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(key_string(key.serialize(&mut ValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let v = value.serialize(&mut ValueSerializer)?;
        let k = self
            .next_key
            .take()
            .ok_or_else(|| Error::Message("serialize_value called before serialize_key".into()))?;
        self.fields.push((k, v));
        Ok(())
    }

    // Duplicate keys are resolved once here: last value, first position.
    fn end(self) -> Result<Value> {
        let obj: Object = self.fields.into_iter().collect();
        Ok(tagged(self.variant, Value::Object(obj)))
    }
}

impl SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.fields.push((key.to_string(), value.serialize(&mut ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value> {
        SerializeMap::end(self)
    }
}

impl SerializeStructVariant for MapSerializer {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<Value> {
        SerializeMap::end(self)
    }
}
