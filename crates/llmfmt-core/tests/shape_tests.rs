/// Shape analyzer tests: classification, sampling, depth measurement, and
/// the encoder recommendation table.
use llmfmt_core::shape::{classify, recommend, ShapeTag};
use llmfmt_core::value::from_json;
use llmfmt_core::{Format, Value};
use serde_json::json;

fn shape(value: serde_json::Value) -> ShapeTag {
    classify(&from_json(value)).shape
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn uniform_primitive_objects() {
    let report = classify(&from_json(json!([
        {"id": 1, "name": "A"},
        {"id": 2, "name": "B"}
    ])));
    assert_eq!(report.shape, ShapeTag::UniformArray);
    assert!(report.uniform_primitive);
    assert_eq!(report.array_len, Some(2));
    assert_eq!(report.field_count, Some(2));
    assert_eq!(report.sample_keys, ["id", "name"]);
}

#[test]
fn uniform_objects_with_nested_values() {
    let report = classify(&from_json(json!([
        {"id": 1, "tags": ["a"]},
        {"id": 2, "tags": ["b"]}
    ])));
    assert_eq!(report.shape, ShapeTag::UniformArray);
    assert!(!report.uniform_primitive);
}

#[test]
fn differing_key_order_is_not_uniform() {
    let report = classify(&from_json(json!([
        {"a": 1, "b": 2},
        {"b": 3, "a": 4}
    ])));
    assert_eq!(report.shape, ShapeTag::SparseArray);
}

#[test]
fn overlapping_key_sets_are_sparse() {
    assert_eq!(
        shape(json!([{"id": 1, "a": 2}, {"id": 3, "b": 4}])),
        ShapeTag::SparseArray
    );
}

#[test]
fn disjoint_key_sets_are_mixed() {
    assert_eq!(shape(json!([{"a": 1}, {"b": 2}])), ShapeTag::Mixed);
}

#[test]
fn equal_length_primitive_rows_are_tabular_data() {
    assert_eq!(shape(json!([[1, 2], [3, 4], [5, 6]])), ShapeTag::TabularData);
}

#[test]
fn ragged_rows_are_mixed() {
    assert_eq!(shape(json!([[1, 2], [3]])), ShapeTag::Mixed);
}

#[test]
fn flat_and_nested_objects() {
    assert_eq!(shape(json!({"a": 1, "b": "x"})), ShapeTag::FlatObject);
    assert_eq!(shape(json!({"a": 1, "b": {"c": 2}})), ShapeTag::NestedObject);
}

#[test]
fn primitives_and_empties() {
    assert_eq!(shape(json!(42)), ShapeTag::Primitive);
    assert_eq!(shape(json!("x")), ShapeTag::Primitive);
    assert_eq!(shape(json!(null)), ShapeTag::Empty);
    assert_eq!(shape(json!({})), ShapeTag::Empty);
    assert_eq!(shape(json!([])), ShapeTag::Empty);
}

#[test]
fn mixed_element_arrays() {
    assert_eq!(shape(json!([1, "two", {"a": 3}])), ShapeTag::Mixed);
    assert_eq!(shape(json!([1, 2, 3])), ShapeTag::Mixed);
}

// ============================================================================
// Sampling and depth
// ============================================================================

#[test]
fn long_arrays_are_judged_from_the_first_hundred() {
    let mut rows: Vec<serde_json::Value> = (0..120).map(|i| json!({"id": i})).collect();
    // Break uniformity past the sampling window
    rows[110] = json!({"other": true});
    let report = classify(&from_json(serde_json::Value::Array(rows)));
    assert_eq!(report.shape, ShapeTag::UniformArray);
    assert_eq!(report.array_len, Some(120));
}

#[test]
fn depth_is_exact() {
    assert_eq!(classify(&from_json(json!(1))).max_depth, 0);
    assert_eq!(classify(&from_json(json!({"a": 1}))).max_depth, 1);
    assert_eq!(classify(&from_json(json!({"a": {"b": 1}}))).max_depth, 2);
    assert_eq!(
        classify(&from_json(json!({"a": [{"b": {"c": 1}}]}))).max_depth,
        4
    );
    assert_eq!(classify(&from_json(json!({"a": {}}))).max_depth, 2);
}

#[test]
fn sample_keys_cap_at_eight() {
    let report = classify(&from_json(json!({
        "k1": 1, "k2": 2, "k3": 3, "k4": 4, "k5": 5,
        "k6": 6, "k7": 7, "k8": 8, "k9": 9, "k10": 10
    })));
    assert_eq!(report.sample_keys.len(), 8);
    assert_eq!(report.sample_keys[0], "k1");
}

// ============================================================================
// Recommendation table
// ============================================================================

fn recommended(value: serde_json::Value) -> Format {
    recommend(&classify(&from_json(value)))
}

#[test]
fn uniform_primitive_arrays_recommend_tsv() {
    assert_eq!(recommended(json!([{"id": 1}, {"id": 2}])), Format::Tsv);
}

#[test]
fn uniform_arrays_with_nesting_recommend_toon() {
    assert_eq!(
        recommended(json!([{"id": 1, "t": [1]}, {"id": 2, "t": [2]}])),
        Format::Toon
    );
}

#[test]
fn tabular_data_recommends_tsv() {
    assert_eq!(recommended(json!([[1, 2], [3, 4]])), Format::Tsv);
}

#[test]
fn sparse_arrays_recommend_toon() {
    assert_eq!(
        recommended(json!([{"id": 1, "a": 2}, {"id": 3, "b": 4}])),
        Format::Toon
    );
}

#[test]
fn flat_objects_recommend_yaml() {
    assert_eq!(recommended(json!({"a": 1, "b": "x"})), Format::Yaml);
}

#[test]
fn shallow_nested_objects_recommend_yaml() {
    assert_eq!(recommended(json!({"a": {"b": 1}})), Format::Yaml);
}

#[test]
fn deep_nested_objects_recommend_json() {
    assert_eq!(recommended(json!({"a": {"b": {"c": 1}}})), Format::Json);
}

#[test]
fn primitives_empties_and_mixed_recommend_json() {
    assert_eq!(recommended(json!(42)), Format::Json);
    assert_eq!(recommended(json!(null)), Format::Json);
    assert_eq!(recommended(json!([1, "x"])), Format::Json);
}

// ============================================================================
// Value model basics the analyzer relies on
// ============================================================================

#[test]
fn duplicate_keys_keep_first_position() {
    let mut map = llmfmt_core::Map::new();
    map.insert("a".to_string(), Value::Int(1));
    map.insert("b".to_string(), Value::Int(2));
    map.insert("a".to_string(), Value::Int(3));
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(map["a"], Value::Int(3));
}

#[test]
fn int_and_float_are_structurally_distinct() {
    assert_ne!(from_json(json!(1)), from_json(json!(1.0)));
}
