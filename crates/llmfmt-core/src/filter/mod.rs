//! Value-to-value rewrites applied between parsing and encoding.
//!
//! Filters compose by position: the caller's order is the execution order,
//! and the chain short-circuits on the first error. Each filter takes
//! ownership of the root and returns a new root (no shared substructure).

mod depth;
mod path;
mod truncate;

pub use self::depth::DepthFilter;
pub use self::path::{IncludeFilter, PathExpr};
pub use self::truncate::{Strategy, TruncateFilter, TruncateSummary, DEFAULT_SAMPLE_SEED};

use crate::error::FilterError;
use crate::value::Value;

/// A single rewrite stage.
pub trait Filter: Send + Sync {
    /// Stable name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Consume the value and produce the rewritten one.
    fn apply(&self, value: Value) -> Result<Value, FilterError>;
}

/// Caller-facing description of one filter, as accepted by the pipeline
/// builder. Compiled eagerly so bad path expressions fail at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Select the sub-tree at `path`; selecting nothing yields null.
    Include { path: String },
    /// Replace containers at or past `depth` with summary strings.
    MaxDepth { depth: u32 },
    /// Cap array lengths and string lengths.
    Truncate {
        max_items: Option<u32>,
        max_string_length: Option<u32>,
        strategy: Strategy,
        preserve: Vec<String>,
        seed: Option<u64>,
    },
}

/// Compile a spec into a runnable filter. `strict` turns truncation events
/// into [`FilterError::LimitExceeded`].
pub fn compile(spec: &FilterSpec, strict: bool) -> Result<Box<dyn Filter>, FilterError> {
    match spec {
        FilterSpec::Include { path } => Ok(Box::new(IncludeFilter::new(path)?)),
        FilterSpec::MaxDepth { depth } => Ok(Box::new(DepthFilter::new(*depth))),
        FilterSpec::Truncate {
            max_items,
            max_string_length,
            strategy,
            preserve,
            seed,
        } => {
            let preserve = preserve
                .iter()
                .map(|p| PathExpr::parse(p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(TruncateFilter::new(
                max_items.map(|n| n as usize),
                max_string_length.map(|n| n as usize),
                *strategy,
                preserve,
                seed.unwrap_or(DEFAULT_SAMPLE_SEED),
                strict,
            )))
        }
    }
}
