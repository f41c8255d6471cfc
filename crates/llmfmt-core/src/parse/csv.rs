//! CSV/TSV parser on top of the csv crate.

use super::Parser;
use crate::error::ParseError;
use crate::value::{Map, Value};

/// Parses delimiter-separated input. The first row is the header; every
/// subsequent row becomes an object keyed by it. All cells are strings (no
/// type coercion). Quoting per RFC 4180; embedded newlines inside quoted
/// fields are preserved. Rows shorter than the header pad with empty
/// strings, longer rows drop their extra cells.
pub struct CsvParser {
    name: &'static str,
    delimiter: u8,
}

impl CsvParser {
    pub fn csv() -> Self {
        CsvParser {
            name: "csv",
            delimiter: b',',
        }
    }

    pub fn tsv() -> Self {
        CsvParser {
            name: "tsv",
            delimiter: b'\t',
        }
    }
}

impl Parser for CsvParser {
    fn format_name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, input: &[u8]) -> Result<Value, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| self.error(&e))?
            .clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.error(&e))?;
            let mut row = Map::with_capacity(headers.len());
            for (i, key) in headers.iter().enumerate() {
                let cell = record.get(i).unwrap_or("");
                row.insert(key.to_string(), Value::String(cell.to_string()));
            }
            rows.push(Value::Object(row));
        }
        Ok(Value::Array(rows))
    }
}

impl CsvParser {
    fn error(&self, err: &csv::Error) -> ParseError {
        ParseError {
            format: self.name,
            byte_offset: err.position().map(|pos| pos.byte() as usize),
            message: err.to_string(),
        }
    }
}
