//! Encoders rendering a [`Value`](crate::Value) into output text.
//!
//! Encoders are total on legal values modulo the declared `EncodeError`
//! cases; lossy stringifications (e.g. a nested array inside a CSV cell)
//! surface as warnings on the result, never as panics.

mod csv;
mod json;
mod toon;
mod yaml;

pub use self::csv::CsvEncoder;
pub use self::json::CompactJsonEncoder;
pub use self::toon::ToonEncoder;
pub use self::yaml::YamlEncoder;

use crate::error::{ConfigError, EncodeError};
use crate::format::Format;
use crate::value::Value;

/// Encoder output: the rendered text plus any fidelity warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub text: String,
    pub warnings: Vec<String>,
}

impl Encoded {
    pub fn clean(text: String) -> Self {
        Encoded {
            text,
            warnings: Vec::new(),
        }
    }
}

/// A format-specific writer: [`Value`] in, text out.
pub trait Encoder: Send + Sync {
    /// Stable format name, matching the registry tag.
    fn format_name(&self) -> &'static str;

    fn encode(&self, value: &Value) -> Result<Encoded, EncodeError>;
}

/// Look up the encoder for an output format tag.
pub fn encoder_for(format: Format) -> Result<Box<dyn Encoder>, ConfigError> {
    match format {
        Format::Toon => Ok(Box::new(ToonEncoder)),
        Format::Json => Ok(Box::new(CompactJsonEncoder)),
        Format::Yaml => Ok(Box::new(YamlEncoder)),
        Format::Csv => Ok(Box::new(CsvEncoder::csv())),
        Format::Tsv => Ok(Box::new(CsvEncoder::tsv())),
        Format::Xml => Err(ConfigError::UnsupportedOutput {
            tag: format.as_str().to_string(),
        }),
    }
}

/// Every encoder the analyzer compares.
pub fn all_encoders() -> Vec<Box<dyn Encoder>> {
    vec![
        Box::new(ToonEncoder),
        Box::new(CompactJsonEncoder),
        Box::new(YamlEncoder),
        Box::new(CsvEncoder::tsv()),
        Box::new(CsvEncoder::csv()),
    ]
}

/// Canonical decimal rendering shared by the text encoders: integers plain,
/// floats shortest-round-trip (Ryu via serde_json), non-finite floats null.
pub(crate) fn format_number(value: &Value) -> String {
    match value {
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => {
            let mut buf = ryu_shortest(*f);
            // Ryu always writes a fraction; keep whole floats distinguishable
            // from integers the way serde_json does (1.0 stays "1.0").
            if !buf.contains(['.', 'e', 'E']) {
                buf.push_str(".0");
            }
            buf
        }
        _ => "null".to_string(),
    }
}

fn ryu_shortest(f: f64) -> String {
    serde_json::Number::from_f64(f)
        .map(|n| n.to_string())
        .unwrap_or_else(|| "null".to_string())
}

/// Whether a bare rendering would be read back as a number. Covers integers,
/// floats, exponent forms, and leading-zero spellings like "05". Shared by
/// the quoting decisions of the TOON and YAML encoders.
pub(crate) fn looks_numeric(s: &str) -> bool {
    let rest = s.strip_prefix('-').unwrap_or(s);
    if rest.is_empty() {
        return false;
    }
    if !rest.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut has_dot = false;
    let mut has_exp = false;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'0'..=b'9' => {}
            b'.' if !has_dot && !has_exp => has_dot = true,
            b'e' | b'E' if !has_exp && i > 0 => has_exp = true,
            b'+' | b'-' if has_exp => {}
            _ => return false,
        }
    }
    true
}
