//! Array and string truncation with preserve paths and strict mode.

use serde::Serialize;

use crate::error::{FilterError, LimitKind};
use crate::filter::path::{PathExpr, Segment};
use crate::filter::Filter;
use crate::value::Value;

/// Seed used by the `sample` strategy when the caller does not supply one.
pub const DEFAULT_SAMPLE_SEED: u64 = 0xC0FFEE;

/// Which elements survive when an array exceeds `max_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// First N elements.
    Head,
    /// Last N elements.
    Tail,
    /// ⌈N/2⌉ from the head, ⌊N/2⌋ from the tail.
    Balanced,
    /// N drawn without replacement by a seeded PRNG; survivors keep their
    /// original relative order.
    Sample,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Head
    }
}

/// What one truncation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TruncateSummary {
    pub arrays_truncated: usize,
    pub items_removed: usize,
    pub strings_truncated: usize,
    pub chars_removed: usize,
}

/// Recursively caps array lengths and string lengths.
///
/// Sub-trees matched by a preserve path pass through untouched, and elements
/// that lie on a preserve path are exempt from removal. In strict mode the
/// first truncation-eligible event fails the chain instead.
pub struct TruncateFilter {
    max_items: Option<usize>,
    max_string_length: Option<usize>,
    strategy: Strategy,
    preserve: Vec<PathExpr>,
    seed: u64,
    strict: bool,
}

/// Concrete location of a value, rendered into `LimitExceeded::at_path`.
enum Step {
    Key(String),
    Index(usize),
}

impl TruncateFilter {
    pub fn new(
        max_items: Option<usize>,
        max_string_length: Option<usize>,
        strategy: Strategy,
        preserve: Vec<PathExpr>,
        seed: u64,
        strict: bool,
    ) -> Self {
        TruncateFilter {
            max_items,
            max_string_length,
            strategy,
            preserve,
            seed,
            strict,
        }
    }

    /// Truncate and report what was cut.
    pub fn truncate(&self, value: Value) -> Result<(Value, TruncateSummary), FilterError> {
        let mut summary = TruncateSummary::default();
        let mut path = Vec::new();
        let active: Vec<&[Segment]> = self.preserve.iter().map(|p| p.segments()).collect();
        let out = self.walk(value, &active, &mut path, &mut summary)?;
        Ok((out, summary))
    }

    fn walk(
        &self,
        value: Value,
        active: &[&[Segment]],
        path: &mut Vec<Step>,
        summary: &mut TruncateSummary,
    ) -> Result<Value, FilterError> {
        // A fully consumed preserve expression matches this node: pass the
        // whole sub-tree through.
        if active.iter().any(|segments| segments.is_empty()) {
            return Ok(value);
        }
        match value {
            Value::String(s) => self.clip_string(s, path, summary),
            Value::Object(map) => {
                let mut out = crate::value::Map::with_capacity(map.len());
                for (key, child) in map {
                    let narrowed: Vec<&[Segment]> = active
                        .iter()
                        .filter(|segments| segments[0].admits_key(&key))
                        .map(|segments| &segments[1..])
                        .collect();
                    path.push(Step::Key(key.clone()));
                    let child = self.walk(child, &narrowed, path, summary)?;
                    path.pop();
                    out.insert(key, child);
                }
                Ok(Value::Object(out))
            }
            Value::Array(arr) => self.clip_array(arr, active, path, summary),
            primitive => Ok(primitive),
        }
    }

    fn clip_array(
        &self,
        arr: Vec<Value>,
        active: &[&[Segment]],
        path: &mut Vec<Step>,
        summary: &mut TruncateSummary,
    ) -> Result<Value, FilterError> {
        let len = arr.len();
        let over_limit = self.max_items.map(|max| len > max).unwrap_or(false);
        if over_limit && self.strict {
            return Err(FilterError::LimitExceeded {
                kind: LimitKind::ArrayItems,
                at_path: render_path(path),
                observed: len,
                limit: self.max_items.unwrap_or(0),
            });
        }

        // Elements on a preserve path are exempt from removal.
        let pinned: Vec<bool> = arr
            .iter()
            .enumerate()
            .map(|(idx, elem)| {
                active
                    .iter()
                    .any(|segments| segments[0].admits_element(idx, len, elem))
            })
            .collect();

        let keep: Vec<bool> = if over_limit {
            let mut keep = self.pick(len, self.max_items.unwrap_or(len));
            for (idx, pin) in pinned.iter().enumerate() {
                if *pin {
                    keep[idx] = true;
                }
            }
            keep
        } else {
            vec![true; len]
        };

        let kept = keep.iter().filter(|k| **k).count();
        if kept < len {
            summary.arrays_truncated += 1;
            summary.items_removed += len - kept;
        }

        let mut out = Vec::with_capacity(kept);
        for (idx, elem) in arr.into_iter().enumerate() {
            if !keep[idx] {
                continue;
            }
            let narrowed: Vec<&[Segment]> = active
                .iter()
                .filter(|segments| segments[0].admits_element(idx, len, &elem))
                .map(|segments| &segments[1..])
                .collect();
            path.push(Step::Index(idx));
            let elem = self.walk(elem, &narrowed, path, summary)?;
            path.pop();
            out.push(elem);
        }
        Ok(Value::Array(out))
    }

    /// Strategy selection as a keep-mask over original indices.
    fn pick(&self, len: usize, max: usize) -> Vec<bool> {
        let mut keep = vec![false; len];
        match self.strategy {
            Strategy::Head => {
                keep[..max].fill(true);
            }
            Strategy::Tail => {
                keep[len - max..].fill(true);
            }
            Strategy::Balanced => {
                let head = max.div_ceil(2);
                let tail = max - head;
                keep[..head].fill(true);
                keep[len - tail..].fill(true);
            }
            Strategy::Sample => {
                // Partial Fisher-Yates over the index space; survivors stay
                // in original order because we mark rather than reorder.
                let mut rng = fastrand::Rng::with_seed(self.seed);
                let mut indices: Vec<usize> = (0..len).collect();
                for slot in 0..max {
                    let chosen = rng.usize(slot..len);
                    indices.swap(slot, chosen);
                }
                for &idx in &indices[..max] {
                    keep[idx] = true;
                }
            }
        }
        keep
    }

    fn clip_string(
        &self,
        s: String,
        path: &mut Vec<Step>,
        summary: &mut TruncateSummary,
    ) -> Result<Value, FilterError> {
        let Some(max) = self.max_string_length else {
            return Ok(Value::String(s));
        };
        let count = s.chars().count();
        if count <= max {
            return Ok(Value::String(s));
        }
        if self.strict {
            return Err(FilterError::LimitExceeded {
                kind: LimitKind::StringLength,
                at_path: render_path(path),
                observed: count,
                limit: max,
            });
        }
        summary.strings_truncated += 1;
        // The ellipsis is appended only when it fits within the cap, so the
        // result never exceeds max scalars.
        let clipped = if max == 0 {
            summary.chars_removed += count;
            String::new()
        } else {
            summary.chars_removed += count - (max - 1);
            let mut clipped: String = s.chars().take(max - 1).collect();
            clipped.push('…');
            clipped
        };
        Ok(Value::String(clipped))
    }
}

impl Filter for TruncateFilter {
    fn name(&self) -> &'static str {
        "truncate"
    }

    fn apply(&self, value: Value) -> Result<Value, FilterError> {
        self.truncate(value).map(|(out, _)| out)
    }
}

fn render_path(path: &[Step]) -> String {
    if path.is_empty() {
        return "$".to_string();
    }
    let mut out = String::new();
    for step in path {
        match step {
            Step::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Step::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}
