//! Compact JSON encoder (RFC 8259, no whitespace).

use super::{Encoded, Encoder};
use crate::error::EncodeError;
use crate::value::{self, Value};

/// Emits minified JSON. Object keys keep insertion order; floats render via
/// the shortest-round-trip algorithm (Ryu, through serde_json).
pub struct CompactJsonEncoder;

impl Encoder for CompactJsonEncoder {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<Encoded, EncodeError> {
        Ok(Encoded::clean(compact(value)))
    }
}

/// Render a value as compact JSON. Shared with the tabular encoders, which
/// stringify non-representable cells this way.
pub(crate) fn compact(value: &Value) -> String {
    // Lowering to serde_json::Value cannot fail and to_string on it cannot
    // either (no non-string keys, no non-finite numbers survive lowering).
    serde_json::to_string(&value::to_json(value)).unwrap_or_default()
}
