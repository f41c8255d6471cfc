//! Depth limiting with visible placeholders.

use crate::error::FilterError;
use crate::filter::Filter;
use crate::value::Value;

/// Replaces every container at or past `max_depth` with a summary string
/// (`{…N keys}` / `[…N items]`) so the cut stays visible to the consumer.
/// Primitives are always preserved; depth 0 summarizes a container root.
/// Applying the filter twice is the same as applying it once.
pub struct DepthFilter {
    max_depth: u32,
}

impl DepthFilter {
    pub fn new(max_depth: u32) -> Self {
        DepthFilter { max_depth }
    }
}

impl Filter for DepthFilter {
    fn name(&self) -> &'static str {
        "max-depth"
    }

    fn apply(&self, value: Value) -> Result<Value, FilterError> {
        Ok(clamp(value, 0, self.max_depth))
    }
}

fn clamp(value: Value, depth: u32, cap: u32) -> Value {
    match value {
        Value::Object(map) => {
            if depth >= cap {
                Value::String(format!("{{…{} keys}}", map.len()))
            } else {
                Value::Object(
                    map.into_iter()
                        .map(|(k, v)| (k, clamp(v, depth + 1, cap)))
                        .collect(),
                )
            }
        }
        Value::Array(arr) => {
            if depth >= cap {
                Value::String(format!("[…{} items]", arr.len()))
            } else {
                Value::Array(arr.into_iter().map(|v| clamp(v, depth + 1, cap)).collect())
            }
        }
        primitive => primitive,
    }
}
