//! The in-memory value tree shared by every pipeline stage.
//!
//! A [`Value`] mirrors JSON types but separates integers from floats (the
//! output formats reproduce the distinction) and backs objects with an
//! insertion-ordered map. Key order is part of the value: it drives TOON and
//! TSV column ordering and must survive every parser, filter, and encoder.

use indexmap::IndexMap;

/// Insertion-ordered string-keyed map backing [`Value::Object`].
///
/// `IndexMap::insert` implements the duplicate-key rule directly: a later
/// occurrence replaces the value but keeps the first occurrence's position.
pub type Map = IndexMap<String, Value>;

/// A parsed document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Integer that fits `i64`. Anything wider parses as `Float`.
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    /// Key-value pairs in insertion order.
    Object(Map),
}

impl Value {
    /// True for `Null`, `Bool`, `Int`, `Float`, and `String`.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type label used in error and warning messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Lift a `serde_json::Value` into the pipeline value model.
///
/// Numbers follow the one-way promotion rule: `i64`-representable integers
/// stay integers, everything else (u64 overflow, fractions, exponents)
/// becomes a float. Requires serde_json's `preserve_order` feature so object
/// key order carries over.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                // u64 above i64::MAX or a float literal
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k, from_json(v));
            }
            Value::Object(out)
        }
    }
}

/// Lower a [`Value`] to `serde_json::Value`, preserving key order.
///
/// Non-finite floats have no JSON representation and lower to `null`; parsers
/// never produce them, so this only matters for hand-built trees.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(to_json).collect()),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.clone(), to_json(v));
            }
            serde_json::Value::Object(out)
        }
    }
}
