//! Make an untyped value safe for a JSON encoder.
//!
//! Big integers become decimal strings, instants become ISO 8601 strings (or
//! null when invalid), containers are rebuilt element by element and every
//! other value passes through. The walk keeps its own stack, so input depth
//! never grows the call stack, and it never fails.

use std::slice;

use num_bigint::BigInt;
use tracing::{debug, warn};

use crate::options::{BigIntFormat, Options};
use crate::value::{Object, Value};

pub fn sanitize(value: &Value) -> Value {
    sanitize_with(value, &Options::default())
}

pub fn sanitize_with(value: &Value, options: &Options) -> Value {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut done = descend(value, 0, options, &mut stack);
    loop {
        if let Some(v) = done.take() {
            match stack.last_mut() {
                Some(frame) => frame.accept(v),
                None => return v,
            }
        }
        // `descend` either finished a value or pushed a frame, so the stack is non-empty here.
        let Some(frame) = stack.last_mut() else {
            return Value::Undefined;
        };
        let depth = frame.depth + 1;
        done = match frame.next_child() {
            Some(child) => descend(child, depth, options, &mut stack),
            None => stack.pop().map(Frame::finish),
        };
    }
}

pub fn format_bigint(n: &BigInt, format: BigIntFormat) -> String {
    match format {
        BigIntFormat::Decimal => n.to_string(),
        BigIntFormat::Suffixed => format!("{n}n"),
    }
}

fn descend<'a>(
    value: &'a Value,
    depth: usize,
    options: &Options,
    stack: &mut Vec<Frame<'a>>,
) -> Option<Value> {
    match value {
        Value::Undefined => Some(Value::Undefined),
        Value::Null => Some(Value::Null),
        Value::BigInt(n) => Some(Value::String(format_bigint(n, options.bigint_format))),
        Value::Instant(instant) => match instant.to_iso_string() {
            Some(s) => Some(Value::String(s)),
            None => {
                debug!(depth, "invalid instant replaced with null");
                Some(Value::Null)
            }
        },
        Value::Array(_) | Value::Object(_) if options.max_depth.is_some_and(|max| depth > max) => {
            warn!(depth, max_depth = ?options.max_depth, "nesting too deep, subtree replaced with null");
            Some(Value::Null)
        }
        Value::Array(items) => {
            stack.push(Frame {
                depth,
                kind: FrameKind::Array {
                    items: items.iter(),
                    out: Vec::with_capacity(items.len()),
                },
            });
            None
        }
        Value::Object(obj) => {
            let fields = obj.own_fields();
            stack.push(Frame {
                depth,
                kind: FrameKind::Object {
                    fields: fields.iter(),
                    key: None,
                    out: Vec::with_capacity(fields.len()),
                },
            });
            None
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Some(value.clone()),
    }
}

struct Frame<'a> {
    depth: usize,
    kind: FrameKind<'a>,
}

enum FrameKind<'a> {
    Array {
        items: slice::Iter<'a, Value>,
        out: Vec<Value>,
    },
    Object {
        fields: slice::Iter<'a, (String, Value)>,
        key: Option<&'a str>,
        out: Vec<(String, Value)>,
    },
}

impl<'a> Frame<'a> {
    fn next_child(&mut self) -> Option<&'a Value> {
        match &mut self.kind {
            FrameKind::Array { items, .. } => items.next(),
            FrameKind::Object { fields, key, .. } => {
                let (k, v) = fields.next()?;
                *key = Some(k.as_str());
                Some(v)
            }
        }
    }

    fn accept(&mut self, value: Value) {
        match &mut self.kind {
            FrameKind::Array { out, .. } => out.push(value),
            FrameKind::Object { key, out, .. } => {
                if let Some(k) = key.take() {
                    out.push((k.to_string(), value));
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self.kind {
            FrameKind::Array { out, .. } => Value::Array(out),
            FrameKind::Object { out, .. } => Value::Object(Object::from_unique_fields(out)),
        }
    }
}
