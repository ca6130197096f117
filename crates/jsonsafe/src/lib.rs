#![doc = include_str!("../README.md")]

pub mod error;
pub mod extension;
pub mod instant;
pub mod json;
pub mod options;
pub mod sanitize;
pub mod ser;
pub mod tagged;
pub mod value;

pub use crate::error::{Error, Result};
pub use crate::instant::Instant;
pub use crate::json::{to_json, to_string, to_writer};
pub use crate::options::{BigIntFormat, Options};
pub use crate::sanitize::{sanitize, sanitize_with};
pub use crate::ser::to_value;
pub use crate::tagged::{from_tagged_json, from_tagged_str};
pub use crate::value::{Object, Value};
pub use num_bigint::BigInt;

use std::io::Write;

use serde::Serialize;

/// Serialize `value`, sanitize the result and encode it as JSON text.
pub fn encode_to_string<T: Serialize>(value: &T, options: &Options) -> Result<String> {
    let v = crate::ser::to_value(value)?;
    crate::json::to_string(&v, options)
}

/// Like [`encode_to_string`], but writes the JSON text to `writer`.
pub fn encode_to_writer<W: Write, T: Serialize>(writer: W, value: &T, options: &Options) -> Result<()> {
    let v = crate::ser::to_value(value)?;
    crate::json::to_writer(writer, &v, options)
}
