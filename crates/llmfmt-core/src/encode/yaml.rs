//! YAML encoder: block style, two-space indentation, minimal quoting.

use super::{format_number, looks_numeric, Encoded, Encoder};
use crate::error::EncodeError;
use crate::value::Value;

/// Emits block-style YAML. A scalar is quoted only when a plain spelling
/// would be misread: keyword look-alikes (`true`/`null`/`yes`/`on`/...),
/// numeric look-alikes, reserved leading indicators, control characters,
/// edge whitespace, or an embedded `: ` / ` #`. Multi-line strings use the
/// literal block style where it is lossless, double quotes otherwise. Keys
/// keep insertion order.
pub struct YamlEncoder;

impl Encoder for YamlEncoder {
    fn format_name(&self) -> &'static str {
        "yaml"
    }

    fn encode(&self, value: &Value) -> Result<Encoded, EncodeError> {
        let mut out = String::new();
        match value {
            Value::Object(map) if !map.is_empty() => {
                let mut first = true;
                for (key, child) in map {
                    if !first {
                        out.push('\n');
                    }
                    first = false;
                    write_entry(key, child, 0, &mut out);
                }
            }
            Value::Array(arr) if !arr.is_empty() => {
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    write_item(item, 0, &mut out);
                }
            }
            other => write_scalar_or_flow(other, 0, &mut out),
        }
        Ok(Encoded::clean(out))
    }
}

/// One `key: ...` mapping entry. The caller wrote the indent; nested blocks
/// land at `depth + 1`.
fn write_entry(key: &str, value: &Value, depth: usize, out: &mut String) {
    write_key(key, out);
    match value {
        Value::Object(map) if map.is_empty() => out.push_str(": {}"),
        Value::Array(arr) if arr.is_empty() => out.push_str(": []"),
        Value::Object(map) => {
            out.push(':');
            for (k, v) in map {
                out.push('\n');
                push_indent(depth + 1, out);
                write_entry(k, v, depth + 1, out);
            }
        }
        Value::Array(arr) => {
            out.push(':');
            for item in arr {
                out.push('\n');
                push_indent(depth + 1, out);
                write_item(item, depth + 1, out);
            }
        }
        primitive => {
            out.push_str(": ");
            write_scalar_or_flow(primitive, depth, out);
        }
    }
}

/// One `- ...` sequence item. Object items put their first entry on the dash
/// line, the conventional block layout:
///
/// ```text
/// - id: 1
///   name: Alice
/// ```
fn write_item(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Object(map) if map.is_empty() => out.push_str("- {}"),
        Value::Array(arr) if arr.is_empty() => out.push_str("- []"),
        Value::Object(map) => {
            out.push_str("- ");
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                    push_indent(depth + 1, out);
                }
                write_entry(k, v, depth + 1, out);
            }
        }
        Value::Array(arr) => {
            out.push('-');
            for item in arr {
                out.push('\n');
                push_indent(depth + 1, out);
                write_item(item, depth + 1, out);
            }
        }
        primitive => {
            out.push_str("- ");
            write_scalar_or_flow(primitive, depth, out);
        }
    }
}

/// A primitive value (or an empty container in flow spelling) in value
/// position at `depth`.
fn write_scalar_or_flow(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(_) | Value::Float(_) => out.push_str(&format_number(value)),
        Value::String(s) => write_string(s, depth, out),
        Value::Object(_) => out.push_str("{}"),
        Value::Array(_) => out.push_str("[]"),
    }
}

fn write_string(s: &str, depth: usize, out: &mut String) {
    if s.contains('\n') && literal_block_safe(s) {
        write_literal_block(s, depth, out);
    } else if needs_quoting(s) {
        write_double_quoted(s, out);
    } else {
        out.push_str(s);
    }
}

/// Literal blocks are used only where loaders reproduce the exact content:
/// no carriage returns, no other control characters, no indentation-fooling
/// leading space, no trailing space on any line, and at most one final
/// newline (chomped with `|-` when there is none).
fn literal_block_safe(s: &str) -> bool {
    if s.starts_with([' ', '\t', '\n']) || s.ends_with("\n\n") {
        return false;
    }
    if s.chars().any(|c| c.is_control() && c != '\n') {
        return false;
    }
    s.lines().all(|line| !line.ends_with([' ', '\t']))
}

fn write_literal_block(s: &str, depth: usize, out: &mut String) {
    let (body, chomp) = match s.strip_suffix('\n') {
        Some(body) => (body, "|"),
        None => (s, "|-"),
    };
    out.push_str(chomp);
    for line in body.split('\n') {
        out.push('\n');
        if !line.is_empty() {
            push_indent(depth + 1, out);
            out.push_str(line);
        }
    }
}

fn write_double_quoted(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Whether a plain spelling of `s` would parse as something other than this
/// exact string.
fn needs_quoting(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if s != s.trim() {
        return true;
    }
    if is_keyword_like(s) || looks_numeric(s) || is_radix_number(s) {
        return true;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return true;
    }
    if s.chars().any(|c| c.is_control()) {
        return true;
    }
    let first = s.chars().next().unwrap_or(' ');
    if matches!(
        first,
        '&' | '*' | '!' | '|' | '>' | '%' | '@' | '#' | ',' | '[' | ']' | '{' | '}' | '"' | '\''
            | '`'
    ) {
        return true;
    }
    // '-', '?', ':' are only indicators when alone or followed by a space.
    if matches!(first, '-' | '?' | ':') && (s.len() == 1 || s.as_bytes()[1] == b' ') {
        return true;
    }
    false
}

fn is_keyword_like(s: &str) -> bool {
    if s == "~" {
        return true;
    }
    matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "yes" | "no" | "on" | "off"
    )
}

/// YAML 1.2 core schema also reads `0x`/`0o` spellings as integers.
fn is_radix_number(s: &str) -> bool {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit());
    }
    if let Some(oct) = s.strip_prefix("0o").or_else(|| s.strip_prefix("0O")) {
        return !oct.is_empty() && oct.bytes().all(|b| (b'0'..=b'7').contains(&b));
    }
    false
}

/// Keys reuse the scalar quoting rule; multi-line keys are always quoted.
fn write_key(key: &str, out: &mut String) {
    if key.contains('\n') || needs_quoting(key) {
        write_double_quoted(key, out);
    } else {
        out.push_str(key);
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}
