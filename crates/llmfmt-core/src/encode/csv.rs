//! CSV and TSV encoders.
//!
//! Both require a tabular root: an array of objects (header row is the union
//! of keys in first-occurrence order, missing cells empty) or an array of
//! arrays (rows only, no header). Nested values inside a cell have no
//! faithful spelling in either format; they are stringified as compact JSON
//! and reported as warnings.

use super::{format_number, json, Encoded, Encoder};
use crate::error::EncodeError;
use crate::value::Value;

/// Emits delimiter-separated rows joined with `\n` (no trailing newline).
///
/// CSV quotes per RFC 4180: a cell is quoted iff it contains the delimiter,
/// `"`, CR, or LF, and embedded `"` doubles. TSV never quotes; tabs, LFs,
/// and CRs inside a cell become the two-character escapes `\t`, `\n`, `\r`.
pub struct CsvEncoder {
    name: &'static str,
    delimiter: char,
}

impl CsvEncoder {
    pub fn csv() -> Self {
        CsvEncoder {
            name: "csv",
            delimiter: ',',
        }
    }

    pub fn tsv() -> Self {
        CsvEncoder {
            name: "tsv",
            delimiter: '\t',
        }
    }
}

impl Encoder for CsvEncoder {
    fn format_name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, value: &Value) -> Result<Encoded, EncodeError> {
        let rows = value.as_array().ok_or(EncodeError::NotTabular {
            encoder: self.name,
        })?;

        if rows.iter().all(|row| matches!(row, Value::Object(_))) && !rows.is_empty() {
            return Ok(self.encode_objects(rows));
        }
        if rows.iter().all(|row| matches!(row, Value::Array(_))) && !rows.is_empty() {
            return Ok(self.encode_rows(rows));
        }
        Err(EncodeError::NotTabular { encoder: self.name })
    }
}

impl CsvEncoder {
    /// Array-of-objects form: header is the first-occurrence union of keys.
    fn encode_objects(&self, rows: &[Value]) -> Encoded {
        let mut header: Vec<&str> = Vec::new();
        for row in rows {
            if let Some(map) = row.as_object() {
                for key in map.keys() {
                    if !header.contains(&key.as_str()) {
                        header.push(key);
                    }
                }
            }
        }

        let mut out = String::with_capacity(rows.len() * header.len() * 8);
        let mut warnings = Vec::new();
        for (i, key) in header.iter().enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            self.push_cell(key, &mut out);
        }
        for (row_idx, row) in rows.iter().enumerate() {
            out.push('\n');
            let map = row.as_object().expect("object row");
            for (i, key) in header.iter().enumerate() {
                if i > 0 {
                    out.push(self.delimiter);
                }
                match map.get(*key) {
                    Some(cell) => self.push_value(cell, row_idx, key, &mut out, &mut warnings),
                    None => {} // missing cell stays empty
                }
            }
        }
        Encoded { text: out, warnings }
    }

    /// Array-of-arrays form: stringified cells, no header.
    fn encode_rows(&self, rows: &[Value]) -> Encoded {
        let mut out = String::with_capacity(rows.len() * 16);
        let mut warnings = Vec::new();
        for (row_idx, row) in rows.iter().enumerate() {
            if row_idx > 0 {
                out.push('\n');
            }
            let cells = row.as_array().expect("array row");
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    out.push(self.delimiter);
                }
                self.push_value(cell, row_idx, &i.to_string(), &mut out, &mut warnings);
            }
        }
        Encoded { text: out, warnings }
    }

    fn push_value(
        &self,
        cell: &Value,
        row: usize,
        column: &str,
        out: &mut String,
        warnings: &mut Vec<String>,
    ) {
        match cell {
            Value::Null => {} // empty cell
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(_) | Value::Float(_) => out.push_str(&format_number(cell)),
            Value::String(s) => self.push_cell(s, out),
            nested => {
                warnings.push(format!(
                    "{} cell at row {row}, column {column:?} holds a nested {}; emitted as JSON",
                    self.name,
                    nested.type_name(),
                ));
                self.push_cell(&json::compact(nested), out);
            }
        }
    }

    fn push_cell(&self, text: &str, out: &mut String) {
        if self.delimiter == '\t' {
            // TSV has no quoting; escape the structural characters.
            for ch in text.chars() {
                match ch {
                    '\t' => out.push_str("\\t"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    c => out.push(c),
                }
            }
        } else if text.contains([self.delimiter, '"', '\r', '\n']) {
            out.push('"');
            for ch in text.chars() {
                if ch == '"' {
                    out.push('"');
                }
                out.push(ch);
            }
            out.push('"');
        } else {
            out.push_str(text);
        }
    }
}
