//! TOON encoder — the token-oriented notation this crate exists for.
//!
//! TOON collapses an array of uniformly-shaped objects into one header plus
//! one compact row per element, eliminating repeated key names and most
//! quoting:
//!
//! ```text
//! users[2]{id,name,role}:
//!   1,Alice,admin
//!   2,Bob,user
//! ```
//!
//! Non-tabular containers nest by indentation: a keyed object opens a
//! `{k1,k2}:` block listing its keys once, with primitive children as bare
//! values in header order and nested children re-anchored by their key; a
//! non-tabular array opens an `[N]:` block with one element per line.

use super::{format_number, looks_numeric, Encoded, Encoder};
use crate::error::EncodeError;
use crate::value::{Map, Value};

/// Emits TOON. Two-space indentation, `\n` separators, no trailing newline.
pub struct ToonEncoder;

impl Encoder for ToonEncoder {
    fn format_name(&self) -> &'static str {
        "toon"
    }

    fn encode(&self, value: &Value) -> Result<Encoded, EncodeError> {
        let mut out = String::new();
        match value {
            // A named root: entries render as keyed lines at indent 0.
            Value::Object(map) if !map.is_empty() => {
                let mut first = true;
                for (key, child) in map {
                    if !first {
                        out.push('\n');
                    }
                    first = false;
                    encode_keyed(key, child, 0, &mut out);
                }
            }
            other => encode_element(other, 0, &mut out),
        }
        Ok(Encoded::clean(out))
    }
}

/// Encode a value in element position (array element, block child, or a
/// non-object root). The caller has already written this line's indent.
fn encode_element(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push('{');
            push_key_list(map, out);
            out.push_str("}:");
            for (key, child) in map {
                out.push('\n');
                push_indent(depth + 1, out);
                if child.is_primitive() {
                    push_primitive(child, out);
                } else {
                    encode_keyed(key, child, depth + 1, out);
                }
            }
        }
        Value::Array(arr) if arr.is_empty() => out.push_str("[]"),
        Value::Array(arr) => {
            if let Some(fields) = tabular_fields(arr) {
                push_tabular_header(arr.len(), &fields, out);
                push_tabular_rows(arr, &fields, depth + 1, out);
            } else {
                out.push_str(&format!("[{}]:", arr.len()));
                for elem in arr {
                    out.push('\n');
                    push_indent(depth + 1, out);
                    encode_element(elem, depth + 1, out);
                }
            }
        }
        primitive => push_primitive(primitive, out),
    }
}

/// Encode a `key: value` entry. The caller has already written the indent.
fn encode_keyed(key: &str, value: &Value, depth: usize, out: &mut String) {
    push_key(key, out);
    match value {
        Value::Object(map) if map.is_empty() => out.push_str(": {}"),
        Value::Object(_) => {
            out.push(':');
            out.push('\n');
            push_indent(depth + 1, out);
            encode_element(value, depth + 1, out);
        }
        Value::Array(arr) if arr.is_empty() => out.push_str(": []"),
        Value::Array(arr) => {
            if let Some(fields) = tabular_fields(arr) {
                push_tabular_header(arr.len(), &fields, out);
                push_tabular_rows(arr, &fields, depth + 1, out);
            } else {
                out.push_str(&format!("[{}]:", arr.len()));
                for elem in arr {
                    out.push('\n');
                    push_indent(depth + 1, out);
                    encode_element(elem, depth + 1, out);
                }
            }
        }
        primitive => {
            out.push_str(": ");
            push_primitive(primitive, out);
        }
    }
}

/// `[N]{k1,k2,...}:` — when a key precedes the header, the caller has
/// already written it.
fn push_tabular_header(len: usize, fields: &[&str], out: &mut String) {
    out.push('[');
    out.push_str(&len.to_string());
    out.push_str("]{");
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_key(field, out);
    }
    out.push_str("}:");
}

/// One comma-joined row per element, reusing the first element's key order.
fn push_tabular_rows(arr: &[Value], fields: &[&str], depth: usize, out: &mut String) {
    for elem in arr {
        out.push('\n');
        push_indent(depth, out);
        if let Value::Object(map) = elem {
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_primitive(map.get(*field).unwrap_or(&Value::Null), out);
            }
        }
    }
}

/// Tabular eligibility: non-empty array, every element an object, identical
/// key sets in identical order, every value primitive. An all-empty-objects
/// array is excluded (a zero-column table has no representable rows).
fn tabular_fields(arr: &[Value]) -> Option<Vec<&str>> {
    let first = arr.first()?.as_object()?;
    if first.is_empty() {
        return None;
    }
    if first.values().any(|v| !v.is_primitive()) {
        return None;
    }
    let fields: Vec<&str> = first.keys().map(String::as_str).collect();
    for elem in &arr[1..] {
        let obj = elem.as_object()?;
        if obj.len() != fields.len() {
            return None;
        }
        for (key, field) in obj.keys().zip(&fields) {
            if key != field {
                return None;
            }
        }
        if obj.values().any(|v| !v.is_primitive()) {
            return None;
        }
    }
    Some(fields)
}

fn push_key_list(map: &Map, out: &mut String) {
    for (i, key) in map.keys().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_key(key, out);
    }
}

/// Null, booleans, numbers, and strings. Strings quote only when ambiguous.
fn push_primitive(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(_) | Value::Float(_) => out.push_str(&format_number(value)),
        Value::String(s) => push_string(s, out),
        // Containers never reach primitive position; eligibility and the
        // element dispatch exclude them.
        _ => out.push_str("null"),
    }
}

/// A string must be quoted iff it contains a delimiter or quote character
/// (`,` tab newline CR `"` `'`), begins with a structural character
/// (`{` `[` `"` `'`), matches a keyword (`true`/`false`/`null`), reads as a
/// number, has leading or trailing whitespace, or is empty.
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s.contains([',', '\t', '\n', '\r', '"', '\'']) {
        return true;
    }
    if s.starts_with(['{', '[']) {
        return true;
    }
    if s == "true" || s == "false" || s == "null" {
        return true;
    }
    if looks_numeric(s) {
        return true;
    }
    s != s.trim()
}

fn push_string(s: &str, out: &mut String) {
    if !needs_quoting(s) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

/// Keys matching `[A-Za-z_][A-Za-z0-9_.]*` are emitted bare; anything else
/// is quoted with the string escapes.
fn push_key(key: &str, out: &mut String) {
    let mut chars = key.chars();
    let bare = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        }
        _ => false,
    };
    if bare {
        out.push_str(key);
    } else {
        out.push('"');
        for ch in key.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(ch),
            }
        }
        out.push('"');
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
