//! YAML parser (safe subset) on top of serde_yml.

use super::Parser;
use crate::error::ParseError;
use crate::value::{Map, Value};

/// Parses a single YAML document with the core schema: `true`/`false`/`null`
/// resolve to booleans and null, plain scalars that read as numbers become
/// numbers, and everything else stays a string. Tags are stripped to their
/// inner value; mapping key order follows the document.
pub struct YamlParser;

impl Parser for YamlParser {
    fn format_name(&self) -> &'static str {
        "yaml"
    }

    fn parse(&self, input: &[u8]) -> Result<Value, ParseError> {
        let doc: serde_yml::Value = serde_yml::from_slice(input).map_err(|e| ParseError {
            format: "yaml",
            byte_offset: e.location().map(|loc| loc.index()),
            message: e.to_string(),
        })?;
        Ok(lift(doc))
    }
}

fn lift(yaml: serde_yml::Value) -> Value {
    match yaml {
        serde_yml::Value::Null => Value::Null,
        serde_yml::Value::Bool(b) => Value::Bool(b),
        serde_yml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_yml::Value::String(s) => Value::String(s),
        serde_yml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(lift).collect()),
        serde_yml::Value::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                out.insert(key_string(&k), lift(v));
            }
            Value::Object(out)
        }
        // Safe subset: the tag itself is dropped, the payload survives.
        serde_yml::Value::Tagged(tagged) => lift(tagged.value),
    }
}

/// Render a non-string mapping key with its scalar spelling (`1` -> "1",
/// `true` -> "true"). Composite keys fall back to their flow spelling.
fn key_string(key: &serde_yml::Value) -> String {
    match key {
        serde_yml::Value::String(s) => s.clone(),
        serde_yml::Value::Bool(b) => b.to_string(),
        serde_yml::Value::Number(n) => n.to_string(),
        serde_yml::Value::Null => "null".to_string(),
        other => serde_yml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
