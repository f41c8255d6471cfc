//! Parsers lifting each input format into the [`Value`](crate::Value) model.
//!
//! Every parser is stateless and shareable across threads. The registry maps
//! a [`Format`] tag to its parser; `toon` has no parser and is rejected at
//! pipeline construction, not inside `run`.

mod csv;
mod detect;
mod json;
mod xml;
mod yaml;

pub use self::csv::CsvParser;
pub use self::detect::detect;
pub use self::json::JsonParser;
pub use self::xml::XmlParser;
pub use self::yaml::YamlParser;

use crate::error::{ConfigError, ParseError};
use crate::format::Format;
use crate::value::Value;

/// A format-specific reader: bytes in, [`Value`] out, all or nothing.
pub trait Parser: Send + Sync {
    /// Stable format name, matching the registry tag.
    fn format_name(&self) -> &'static str;

    /// Parse the full input. On failure no partial value is returned.
    fn parse(&self, input: &[u8]) -> Result<Value, ParseError>;
}

/// Look up the parser for an input format tag.
pub fn parser_for(format: Format) -> Result<Box<dyn Parser>, ConfigError> {
    match format {
        Format::Json => Ok(Box::new(JsonParser)),
        Format::Yaml => Ok(Box::new(YamlParser)),
        Format::Xml => Ok(Box::new(XmlParser::new())),
        Format::Csv => Ok(Box::new(CsvParser::csv())),
        Format::Tsv => Ok(Box::new(CsvParser::tsv())),
        Format::Toon => Err(ConfigError::UnsupportedInput {
            tag: format.as_str().to_string(),
        }),
    }
}
