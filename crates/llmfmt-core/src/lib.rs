//! # llmfmt-core
//!
//! Structured-data transcoder that minimizes the tokens a payload spends
//! inside an LLM prompt. It parses JSON, YAML, XML, or CSV/TSV into one
//! ordered value tree, optionally rewrites the tree (path selection, depth
//! limiting, truncation), and emits TOON, compact JSON, YAML, TSV, or CSV —
//! and can tell you which of those is predicted to be cheapest.
//!
//! Data flows strictly left to right:
//!
//! ```text
//! bytes ──▶ Parser ──▶ Value ──▶ FilterChain ──▶ Value ──▶ Encoder ──▶ text
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use llmfmt_core::{convert, ConvertOptions, Format};
//!
//! let json = br#"{"users":[{"id":1,"name":"Alice","role":"admin"},
//!                          {"id":2,"name":"Bob","role":"user"}]}"#;
//! let toon = convert(
//!     json,
//!     &ConvertOptions {
//!         output_format: Some(Format::Toon),
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//! assert_eq!(
//!     toon,
//!     "users[2]{id,name,role}:\n  1,Alice,admin\n  2,Bob,user"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`value`] — the ordered, typed tree every stage operates on
//! - [`parse`] — per-format parsers plus input auto-detection
//! - [`filter`] — path selection, depth limiting, truncation
//! - [`encode`] — TOON (the centerpiece), compact JSON, YAML, TSV, CSV
//! - [`shape`] — structural classification and encoder recommendation
//! - [`tokens`] — model-free token estimation
//! - [`pipeline`] — composition and the public `convert`/`analyze` surface
//!
//! The core is synchronous and stateless: no I/O, no environment access, no
//! global mutable state. Parsers, filters, and encoders are `Send + Sync`
//! and safe to share across threads.

pub mod encode;
pub mod error;
pub mod filter;
pub mod format;
pub mod parse;
pub mod pipeline;
pub mod shape;
pub mod tokens;
pub mod value;

pub use encode::{Encoded, Encoder};
pub use error::{ConfigError, EncodeError, FilterError, LimitKind, ParseError, PipelineError};
pub use filter::{Filter, FilterSpec, Strategy, TruncateSummary};
pub use format::Format;
pub use parse::Parser;
pub use pipeline::{
    analyze, convert, detect_shape, AnalysisReport, ConvertOptions, EncoderReport, Pipeline,
    PipelineBuilder,
};
pub use shape::{ShapeReport, ShapeTag};
pub use tokens::{estimate_tokens, savings};
pub use value::{Map, Value};
