//! Shape analysis: classify a value cheaply and recommend the encoder
//! predicted to spend the fewest tokens on it.

use serde::Serialize;

use crate::format::Format;
use crate::value::Value;

/// How many array elements are inspected for uniformity. Longer arrays are
/// classified from this prefix.
const SAMPLE_LIMIT: usize = 100;

/// How many keys the report carries as a preview.
const SAMPLE_KEYS: usize = 8;

/// Structural classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeTag {
    /// Array of objects with identical key sets in identical order.
    UniformArray,
    /// Array of objects with overlapping but non-identical key sets.
    SparseArray,
    /// Array of equal-length arrays of primitives.
    TabularData,
    /// Object whose values are all primitive.
    FlatObject,
    /// Object with at least one container value.
    NestedObject,
    /// Null, bool, number, or string at the root.
    Primitive,
    /// Null or an empty container.
    Empty,
    Mixed,
}

/// What the analyzer learned about a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeReport {
    pub shape: ShapeTag,
    /// Length of the root array, when the root is one.
    pub array_len: Option<usize>,
    /// Key count of the root object or of the uniform element shape.
    pub field_count: Option<usize>,
    /// Exact tree depth: primitives are 0, a container is 1 + its deepest
    /// child (an empty container is 1).
    pub max_depth: usize,
    /// Up to eight keys seen at the classification site.
    pub sample_keys: Vec<String>,
    /// For `UniformArray`: whether every element value is primitive (and the
    /// array therefore qualifies for a TSV/TOON table).
    pub uniform_primitive: bool,
}

/// Classify a value. Arrays longer than 100 elements are judged from their
/// first 100; depth is measured exactly.
pub fn classify(value: &Value) -> ShapeReport {
    let max_depth = depth(value);
    match value {
        Value::Null => report(ShapeTag::Empty, None, None, max_depth, vec![], false),
        Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
            report(ShapeTag::Primitive, None, None, max_depth, vec![], false)
        }
        Value::Object(map) if map.is_empty() => {
            report(ShapeTag::Empty, None, Some(0), max_depth, vec![], false)
        }
        Value::Object(map) => {
            let keys = sample_keys(map.keys());
            let flat = map.values().all(Value::is_primitive);
            let tag = if flat {
                ShapeTag::FlatObject
            } else {
                ShapeTag::NestedObject
            };
            report(tag, None, Some(map.len()), max_depth, keys, false)
        }
        Value::Array(arr) if arr.is_empty() => {
            report(ShapeTag::Empty, Some(0), None, max_depth, vec![], false)
        }
        Value::Array(arr) => classify_array(arr, max_depth),
    }
}

fn classify_array(arr: &[Value], max_depth: usize) -> ShapeReport {
    let len = arr.len();
    let sampled = &arr[..len.min(SAMPLE_LIMIT)];

    if sampled.iter().all(|e| matches!(e, Value::Object(_))) {
        return classify_object_array(arr, sampled, max_depth);
    }

    // Array of equal-length primitive rows.
    if sampled.iter().all(|e| matches!(e, Value::Array(_))) {
        let rows: Vec<&[Value]> = sampled
            .iter()
            .filter_map(|e| e.as_array())
            .collect();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let tabular = rows
            .iter()
            .all(|r| r.len() == width && r.iter().all(Value::is_primitive));
        if tabular {
            return report(
                ShapeTag::TabularData,
                Some(len),
                Some(width),
                max_depth,
                vec![],
                false,
            );
        }
    }

    report(ShapeTag::Mixed, Some(len), None, max_depth, vec![], false)
}

fn classify_object_array(arr: &[Value], sampled: &[Value], max_depth: usize) -> ShapeReport {
    let len = arr.len();
    let first = sampled[0].as_object().expect("object element");
    let keys = sample_keys(first.keys());

    let uniform = sampled.iter().all(|e| {
        let obj = e.as_object().expect("object element");
        obj.len() == first.len() && obj.keys().zip(first.keys()).all(|(a, b)| a == b)
    });
    if uniform {
        let primitive = sampled.iter().all(|e| {
            e.as_object()
                .expect("object element")
                .values()
                .all(Value::is_primitive)
        });
        return report(
            ShapeTag::UniformArray,
            Some(len),
            Some(first.len()),
            max_depth,
            keys,
            primitive,
        );
    }

    // Overlapping means some key occurs in more than one element; arrays of
    // pairwise-disjoint objects are just mixed data.
    let mut seen: Vec<&str> = Vec::new();
    let mut overlap = false;
    'outer: for e in sampled {
        for key in e.as_object().expect("object element").keys() {
            if seen.contains(&key.as_str()) {
                overlap = true;
                break 'outer;
            }
        }
        for key in e.as_object().expect("object element").keys() {
            seen.push(key);
        }
    }
    let tag = if overlap {
        ShapeTag::SparseArray
    } else {
        ShapeTag::Mixed
    };
    report(tag, Some(len), None, max_depth, keys, false)
}

fn report(
    shape: ShapeTag,
    array_len: Option<usize>,
    field_count: Option<usize>,
    max_depth: usize,
    sample_keys: Vec<String>,
    uniform_primitive: bool,
) -> ShapeReport {
    ShapeReport {
        shape,
        array_len,
        field_count,
        max_depth,
        sample_keys,
        uniform_primitive,
    }
}

fn sample_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    keys.take(SAMPLE_KEYS).cloned().collect()
}

/// Exact maximum depth of the tree.
fn depth(value: &Value) -> usize {
    match value {
        Value::Array(arr) => 1 + arr.iter().map(depth).max().unwrap_or(0),
        Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// The shape-to-encoder recommendation table.
pub fn recommend(report: &ShapeReport) -> Format {
    match report.shape {
        ShapeTag::UniformArray if report.uniform_primitive => Format::Tsv,
        ShapeTag::UniformArray => Format::Toon,
        ShapeTag::TabularData => Format::Tsv,
        ShapeTag::SparseArray => Format::Toon,
        ShapeTag::FlatObject => Format::Yaml,
        ShapeTag::NestedObject if report.max_depth <= 2 => Format::Yaml,
        ShapeTag::NestedObject => Format::Json,
        ShapeTag::Primitive | ShapeTag::Empty | ShapeTag::Mixed => Format::Json,
    }
}
