//! JSON parser (RFC 8259) on top of serde_json.

use super::Parser;
use crate::error::ParseError;
use crate::value::{self, Value};

/// Parses JSON documents. Numbers without a fractional part or exponent that
/// fit `i64` become integers; everything else becomes a float. Object key
/// order is the order of first occurrence (serde_json `preserve_order`).
pub struct JsonParser;

impl Parser for JsonParser {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, input: &[u8]) -> Result<Value, ParseError> {
        let json: serde_json::Value =
            serde_json::from_slice(input).map_err(|e| ParseError {
                format: "json",
                byte_offset: byte_offset(input, e.line(), e.column()),
                message: e.to_string(),
            })?;
        Ok(value::from_json(json))
    }
}

/// Recover a byte offset from serde_json's 1-based line/column pair.
fn byte_offset(input: &[u8], line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut offset = 0usize;
    let mut seen = 1usize;
    while seen < line {
        let nl = input[offset..].iter().position(|&b| b == b'\n')?;
        offset += nl + 1;
        seen += 1;
    }
    Some(offset + column.saturating_sub(1))
}
