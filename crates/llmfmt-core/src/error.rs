//! Error types for parsing, filtering, encoding, and pipeline construction.

use thiserror::Error;

/// A parser rejected its input. No partial value is ever returned.
#[derive(Error, Debug)]
#[error("{format} parse error{}: {message}", offset_suffix(.byte_offset))]
pub struct ParseError {
    /// Stable name of the parser that failed (`json`, `yaml`, ...).
    pub format: &'static str,
    /// Byte offset into the input, when the underlying parser reports one.
    pub byte_offset: Option<usize>,
    pub message: String,
}

fn offset_suffix(byte_offset: &Option<usize>) -> String {
    match byte_offset {
        Some(offset) => format!(" at byte {offset}"),
        None => String::new(),
    }
}

/// Which configured limit a strict-mode truncation ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    ArrayItems,
    StringLength,
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LimitKind::ArrayItems => "array items",
            LimitKind::StringLength => "string length",
        })
    }
}

/// A filter rejected its configuration or, in strict mode, its input.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A path expression failed to parse.
    #[error("invalid path expression {expression:?}: {message}")]
    InvalidPath { expression: String, message: String },

    /// Strict mode only: a value exceeded a truncation limit.
    #[error("{kind} limit exceeded at {at_path}: {observed} > {limit}")]
    LimitExceeded {
        kind: LimitKind,
        at_path: String,
        observed: usize,
        limit: usize,
    },
}

/// An encoder could not represent the value.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The tabular encoders require an array of objects or an array of arrays
    /// at the root.
    #[error("{encoder} requires a tabular root (array of objects or array of arrays)")]
    NotTabular { encoder: &'static str },

    /// The encoder cannot stringify the value and no fallback exists.
    #[error("{encoder} cannot represent the value at {at_path}")]
    UnrepresentableValue {
        encoder: &'static str,
        at_path: String,
    },
}

/// Pipeline construction rejected a format tag.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown format tag {tag:?}")]
    UnknownFormat { tag: String },

    /// The tag names a real format that cannot be parsed (e.g. `toon`).
    #[error("{tag:?} is not supported as an input format")]
    UnsupportedInput { tag: String },

    /// The tag names a real format that cannot be emitted (e.g. `xml`).
    #[error("{tag:?} is not supported as an output format")]
    UnsupportedOutput { tag: String },
}

/// Any failure of a constructed pipeline, tagged by stage. The `Config`
/// variant can only arise during construction.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
