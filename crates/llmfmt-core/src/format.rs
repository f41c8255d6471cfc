//! Format tags accepted by the pipeline builder.

use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

/// A data format the pipeline can name. Not every format works in both
/// directions: `toon` is output-only and `xml` is input-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Xml,
    Csv,
    Tsv,
    Toon,
}

impl Format {
    /// Resolve a case-insensitive format tag. `yml` is an alias of `yaml`.
    pub fn from_tag(tag: &str) -> Result<Format, ConfigError> {
        match tag.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "xml" => Ok(Format::Xml),
            "csv" => Ok(Format::Csv),
            "tsv" => Ok(Format::Tsv),
            "toon" => Ok(Format::Toon),
            _ => Err(ConfigError::UnknownFormat {
                tag: tag.to_string(),
            }),
        }
    }

    /// Map a filename extension to a format, if it names one.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "xml" => Some(Format::Xml),
            "csv" => Some(Format::Csv),
            "tsv" => Some(Format::Tsv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Xml => "xml",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Toon => "toon",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
