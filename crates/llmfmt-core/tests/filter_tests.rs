/// Filter chain contract tests: path selection, depth limiting, truncation,
/// preserve paths, and strict mode.
use llmfmt_core::filter::{
    compile, DepthFilter, Filter, FilterSpec, IncludeFilter, Strategy, TruncateFilter,
    DEFAULT_SAMPLE_SEED,
};
use llmfmt_core::value::from_json;
use llmfmt_core::{FilterError, LimitKind, Value};
use serde_json::json;

fn v(value: serde_json::Value) -> Value {
    from_json(value)
}

fn include(path: &str, value: serde_json::Value) -> Value {
    IncludeFilter::new(path).unwrap().apply(v(value)).unwrap()
}

// ============================================================================
// Path selection
// ============================================================================

#[test]
fn selects_nested_members() {
    assert_eq!(include("a.b.c", json!({"a": {"b": {"c": 7}}})), v(json!(7)));
}

#[test]
fn selects_array_indices() {
    assert_eq!(include("items[1]", json!({"items": [10, 20, 30]})), v(json!(20)));
}

#[test]
fn negative_indices_count_from_the_end() {
    assert_eq!(include("items[-1]", json!({"items": [10, 20, 30]})), v(json!(30)));
    assert_eq!(include("items[-3]", json!({"items": [10, 20, 30]})), v(json!(10)));
}

#[test]
fn out_of_range_index_selects_null() {
    assert_eq!(include("items[9]", json!({"items": [1]})), Value::Null);
    assert_eq!(include("items[-9]", json!({"items": [1]})), Value::Null);
}

#[test]
fn wildcard_projects_over_every_element() {
    let selected = include(
        "users[*].name",
        json!({"users": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}], "meta": {"page": 1}}),
    );
    assert_eq!(selected, v(json!(["A", "B"])));
}

#[test]
fn projection_keeps_array_length_with_nulls() {
    let selected = include(
        "users[*].name",
        json!({"users": [{"name": "A"}, {"id": 2}]}),
    );
    assert_eq!(selected, v(json!(["A", null])));
}

#[test]
fn missing_member_selects_null() {
    assert_eq!(include("nope.deep", json!({"a": 1})), Value::Null);
}

#[test]
fn predicates_filter_elements() {
    let selected = include(
        "users[?role == \"admin\"].name",
        json!({"users": [
            {"name": "A", "role": "admin"},
            {"name": "B", "role": "user"},
            {"name": "C", "role": "admin"}
        ]}),
    );
    assert_eq!(selected, v(json!(["A", "C"])));
}

#[test]
fn predicates_compare_numbers_across_int_and_float() {
    let selected = include(
        "readings[?value >= 2.5]",
        json!({"readings": [{"value": 1}, {"value": 3}, {"value": 2.5}]}),
    );
    assert_eq!(selected, v(json!([{"value": 3}, {"value": 2.5}])));
}

#[test]
fn predicates_on_missing_keys_never_hold() {
    let selected = include("items[?x != 1]", json!({"items": [{"y": 2}]}));
    assert_eq!(selected, v(json!([])));
}

#[test]
fn chained_includes_compose() {
    let first = include("a.b", json!({"a": {"b": {"c": [1, 2]}}}));
    let second = IncludeFilter::new("c[0]").unwrap().apply(first).unwrap();
    assert_eq!(second, v(json!(1)));
}

#[test]
fn bad_path_syntax_is_rejected_at_construction() {
    for expr in ["", "a..b", "a.", "items[", "items[x]", "[?norole]", "[?= 1]"] {
        let err = IncludeFilter::new(expr).unwrap_err();
        assert!(
            matches!(err, FilterError::InvalidPath { .. }),
            "{expr:?} should be invalid"
        );
    }
}

#[test]
fn predicate_literals_may_contain_brackets() {
    let selected = include(
        "items[?tag == \"a]b\"]",
        json!({"items": [{"tag": "a]b"}, {"tag": "c"}]}),
    );
    assert_eq!(selected, v(json!([{"tag": "a]b"}])));
}

// ============================================================================
// Depth limiting
// ============================================================================

#[test]
fn depth_cap_replaces_containers_with_summaries() {
    let out = DepthFilter::new(2)
        .apply(v(json!({"a": {"b": {"c": {"d": 1}}}})))
        .unwrap();
    assert_eq!(out, v(json!({"a": {"b": "{…1 keys}"}})));
}

#[test]
fn depth_zero_summarizes_the_root() {
    let out = DepthFilter::new(0).apply(v(json!({"a": 1, "b": 2}))).unwrap();
    assert_eq!(out, v(json!("{…2 keys}")));
    let out = DepthFilter::new(0).apply(v(json!([1, 2, 3]))).unwrap();
    assert_eq!(out, v(json!("[…3 items]")));
}

#[test]
fn depth_cap_preserves_primitives() {
    let out = DepthFilter::new(1)
        .apply(v(json!({"kept": "text", "gone": {"x": 1}})))
        .unwrap();
    assert_eq!(out, v(json!({"kept": "text", "gone": "{…1 keys}"})));
}

#[test]
fn depth_filter_is_idempotent() {
    let input = v(json!({"a": [{"b": {"c": 1}}, 2], "d": "x"}));
    let once = DepthFilter::new(2).apply(input.clone()).unwrap();
    let twice = DepthFilter::new(2).apply(once.clone()).unwrap();
    assert_eq!(once, twice);
}

// ============================================================================
// Truncation: arrays
// ============================================================================

fn truncate_items(
    strategy: Strategy,
    max: usize,
    value: serde_json::Value,
) -> (Value, llmfmt_core::TruncateSummary) {
    TruncateFilter::new(Some(max), None, strategy, vec![], DEFAULT_SAMPLE_SEED, false)
        .truncate(v(value))
        .unwrap()
}

#[test]
fn head_keeps_the_first_elements() {
    let (out, summary) = truncate_items(Strategy::Head, 2, json!([1, 2, 3, 4, 5]));
    assert_eq!(out, v(json!([1, 2])));
    assert_eq!(summary.arrays_truncated, 1);
    assert_eq!(summary.items_removed, 3);
}

#[test]
fn tail_keeps_the_last_elements() {
    let (out, _) = truncate_items(Strategy::Tail, 2, json!([1, 2, 3, 4, 5]));
    assert_eq!(out, v(json!([4, 5])));
}

#[test]
fn balanced_splits_head_heavy() {
    let (out, _) = truncate_items(Strategy::Balanced, 3, json!([1, 2, 3, 4, 5, 6]));
    assert_eq!(out, v(json!([1, 2, 6])));
}

#[test]
fn sample_is_deterministic_for_a_seed() {
    let first = truncate_items(Strategy::Sample, 3, json!([1, 2, 3, 4, 5, 6, 7, 8])).0;
    let second = truncate_items(Strategy::Sample, 3, json!([1, 2, 3, 4, 5, 6, 7, 8])).0;
    assert_eq!(first, second);
    let arr = first.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    // Survivors keep their original relative order
    let picked: Vec<i64> = arr
        .iter()
        .map(|e| match e {
            Value::Int(i) => *i,
            _ => unreachable!(),
        })
        .collect();
    let mut sorted = picked.clone();
    sorted.sort_unstable();
    assert_eq!(picked, sorted);
}

#[test]
fn arrays_within_the_limit_are_untouched() {
    let (out, summary) = truncate_items(Strategy::Head, 5, json!([1, 2, 3]));
    assert_eq!(out, v(json!([1, 2, 3])));
    assert_eq!(summary, llmfmt_core::TruncateSummary::default());
}

#[test]
fn truncation_recurses_into_nested_arrays() {
    let (out, summary) = truncate_items(
        Strategy::Head,
        2,
        json!({"groups": [[1, 2, 3], [4, 5, 6], [7]]}),
    );
    assert_eq!(out, v(json!({"groups": [[1, 2], [4, 5]]})));
    assert_eq!(summary.arrays_truncated, 3);
    assert_eq!(summary.items_removed, 3);
}

// ============================================================================
// Truncation: strings
// ============================================================================

fn truncate_strings(max: usize, value: serde_json::Value) -> (Value, llmfmt_core::TruncateSummary) {
    TruncateFilter::new(None, Some(max), Strategy::Head, vec![], DEFAULT_SAMPLE_SEED, false)
        .truncate(v(value))
        .unwrap()
}

#[test]
fn long_strings_cut_to_the_cap_with_an_ellipsis() {
    let (out, summary) = truncate_strings(5, json!("hello world"));
    assert_eq!(out, v(json!("hell…")));
    assert_eq!(summary.strings_truncated, 1);
    assert_eq!(summary.chars_removed, 7);
}

#[test]
fn strings_at_the_cap_are_untouched() {
    let (out, summary) = truncate_strings(5, json!("hello"));
    assert_eq!(out, v(json!("hello")));
    assert_eq!(summary.strings_truncated, 0);
}

#[test]
fn string_cap_counts_unicode_scalars() {
    let (out, _) = truncate_strings(3, json!("héllö!"));
    assert_eq!(out, v(json!("hé…")));
}

#[test]
fn zero_cap_empties_the_string() {
    let (out, _) = truncate_strings(0, json!("abc"));
    assert_eq!(out, v(json!("")));
}

// ============================================================================
// Preserve paths
// ============================================================================

#[test]
fn preserved_subtrees_pass_through_unchanged() {
    let preserve = vec![llmfmt_core::filter::PathExpr::parse("keep").unwrap()];
    let filter = TruncateFilter::new(
        Some(2),
        Some(3),
        Strategy::Head,
        preserve,
        DEFAULT_SAMPLE_SEED,
        false,
    );
    let (out, _) = filter
        .truncate(v(json!({
            "keep": {"long": "untouched text", "list": [1, 2, 3, 4]},
            "cut": [1, 2, 3, 4]
        })))
        .unwrap();
    assert_eq!(
        out,
        v(json!({
            "keep": {"long": "untouched text", "list": [1, 2, 3, 4]},
            "cut": [1, 2]
        }))
    );
}

#[test]
fn elements_on_a_preserve_path_survive_removal() {
    let preserve = vec![llmfmt_core::filter::PathExpr::parse("items[3]").unwrap()];
    let filter = TruncateFilter::new(
        Some(2),
        None,
        Strategy::Head,
        preserve,
        DEFAULT_SAMPLE_SEED,
        false,
    );
    let (out, _) = filter
        .truncate(v(json!({"items": [10, 20, 30, 40, 50]})))
        .unwrap();
    assert_eq!(out, v(json!({"items": [10, 20, 40]})));
}

#[test]
fn preserve_predicates_match_against_the_element() {
    let preserve = vec![llmfmt_core::filter::PathExpr::parse("users[?vip == true]").unwrap()];
    let filter = TruncateFilter::new(
        Some(1),
        None,
        Strategy::Head,
        preserve,
        DEFAULT_SAMPLE_SEED,
        false,
    );
    let (out, _) = filter
        .truncate(v(json!({"users": [
            {"id": 1, "vip": false},
            {"id": 2, "vip": true},
            {"id": 3, "vip": false}
        ]})))
        .unwrap();
    assert_eq!(
        out,
        v(json!({"users": [{"id": 1, "vip": false}, {"id": 2, "vip": true}]}))
    );
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn strict_mode_fails_on_array_overflow() {
    let filter = TruncateFilter::new(
        Some(2),
        None,
        Strategy::Head,
        vec![],
        DEFAULT_SAMPLE_SEED,
        true,
    );
    let err = filter.truncate(v(json!({"users": [1, 2, 3]}))).unwrap_err();
    match err {
        FilterError::LimitExceeded {
            kind,
            at_path,
            observed,
            limit,
        } => {
            assert_eq!(kind, LimitKind::ArrayItems);
            assert_eq!(at_path, "users");
            assert_eq!(observed, 3);
            assert_eq!(limit, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn strict_mode_fails_on_long_strings_with_a_path() {
    let filter = TruncateFilter::new(
        None,
        Some(4),
        Strategy::Head,
        vec![],
        DEFAULT_SAMPLE_SEED,
        true,
    );
    let err = filter
        .truncate(v(json!({"users": [{"bio": "too long"}]})))
        .unwrap_err();
    match err {
        FilterError::LimitExceeded { kind, at_path, .. } => {
            assert_eq!(kind, LimitKind::StringLength);
            assert_eq!(at_path, "users[0].bio");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn strict_mode_passes_values_within_limits() {
    let filter = TruncateFilter::new(
        Some(10),
        Some(100),
        Strategy::Head,
        vec![],
        DEFAULT_SAMPLE_SEED,
        true,
    );
    let input = v(json!({"a": [1, 2], "b": "short"}));
    let (out, summary) = filter.truncate(input.clone()).unwrap();
    assert_eq!(out, input);
    assert_eq!(summary, llmfmt_core::TruncateSummary::default());
}

// ============================================================================
// FilterSpec compilation
// ============================================================================

#[test]
fn specs_compile_into_runnable_filters() {
    let spec = FilterSpec::Truncate {
        max_items: Some(1),
        max_string_length: None,
        strategy: Strategy::Head,
        preserve: vec![],
        seed: None,
    };
    let filter = compile(&spec, false).unwrap();
    let out = filter.apply(v(json!([1, 2, 3]))).unwrap();
    assert_eq!(out, v(json!([1])));
}

#[test]
fn bad_preserve_paths_fail_compilation() {
    let spec = FilterSpec::Truncate {
        max_items: Some(1),
        max_string_length: None,
        strategy: Strategy::Head,
        preserve: vec!["broken[".to_string()],
        seed: None,
    };
    assert!(matches!(
        compile(&spec, false),
        Err(FilterError::InvalidPath { .. })
    ));
}
