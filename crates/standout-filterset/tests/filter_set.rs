//! End-to-end scenarios for building filter sets.

use serde_json::json;
use standout_filterset::{
    Config, FieldFilters, FilterSet, FilterValue, Number, Operator, Payload,
};

fn filters() -> FilterSet {
    FilterSet::from_config(Config::default())
}

fn payload_json(set: &FilterSet) -> serde_json::Value {
    serde_json::to_value(set.payload()).unwrap()
}

// ============================================================================
// Payload shapes
// ============================================================================

#[test]
fn add_single_value_uses_default_operator() {
    let set = filters().add("name", "Max");
    assert_eq!(payload_json(&set), json!({ "name": { "=": ["Max"] } }));
}

#[test]
fn add_many_values() {
    let set = filters().add_all("name", ["Max", "John"]);
    assert_eq!(payload_json(&set), json!({ "name": { "=": ["Max", "John"] } }));
}

#[test]
fn add_then_remove_leaves_empty_payload() {
    let set = filters().add("name", "Max").remove("name", "Max");
    assert_eq!(payload_json(&set), json!({}));
    assert!(set.is_empty());
}

#[test]
fn remove_all_values_of_field() {
    let set = filters()
        .add("name", "Max")
        .add("name", "John")
        .remove_all("name", ["Max", "John"]);
    assert_eq!(payload_json(&set), json!({}));
}

#[test]
fn includes_subset_of_values() {
    let set = filters().add_all("name", ["Max", "John"]);
    assert!(set.includes(&filters().add_all("name", ["Max"])));
    assert!(!set.includes(&filters().add_all("age", [10, 20])));
}

#[test]
fn concat_merges_two_sets() {
    let merged = filters().add("name", "Max").concat(&filters().add("name", "John"));
    assert_eq!(
        payload_json(&merged),
        json!({ "name": { "=": ["Max", "John"] } })
    );
}

#[test]
fn concat_omits_duplicates() {
    let merged = filters()
        .add("name", "Max")
        .add("name", "John")
        .concat(&filters().add("name", "John"));
    assert_eq!(
        payload_json(&merged),
        json!({ "name": { "=": ["Max", "John"] } })
    );
}

#[test]
fn clear_produces_empty_set() {
    let cleared = filters().add("name", "Max").clear();
    assert_eq!(payload_json(&cleared), json!({}));
}

// ============================================================================
// Identity no-ops
// ============================================================================

#[test]
fn adding_twice_returns_same_set() {
    let set = filters().add("name", "Max");
    let again = set.add("name", "Max");
    assert!(FilterSet::ptr_eq(&set, &again));
    assert!(std::ptr::eq(set.payload(), again.payload()));
}

#[test]
fn adding_array_produces_new_set() {
    let empty = filters();
    let set = empty.add_all("name", ["Max", "John"]);
    assert!(!FilterSet::ptr_eq(&empty, &set));
}

#[test]
fn removing_absent_value_returns_same_set() {
    let set = filters().add("name", "Max");
    assert!(FilterSet::ptr_eq(&set, &set.remove("name", "John")));
    assert_eq!(payload_json(&set), json!({ "name": { "=": ["Max"] } }));
}

#[test]
fn removing_under_other_operator_returns_same_set() {
    let set = filters().add("name", "Max");
    let same = set.remove_with("name", "^", ["Max"]);
    assert!(FilterSet::ptr_eq(&set, &same));
}

#[test]
fn clearing_empty_set_returns_same_set() {
    let empty = filters();
    assert!(FilterSet::ptr_eq(&empty, &empty.clear()));
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn exists_after_add() {
    let set = filters().add_all("name", ["Max", "John"]);
    assert!(set.exists("name", "Max"));
    assert!(set.exists_all("name", ["Max", "John"]));
    assert!(!filters().exists("name", "Max"));
}

#[test]
fn exists_for_values_added_one_by_one() {
    let set = filters().add("name", "Max").add("name", "John");
    assert!(set.exists_all("name", ["Max", "John"]));
}

#[test]
fn exists_fails_when_some_values_missing() {
    let set = filters().add_all("name", ["Max", "John"]);
    assert!(!set.exists_all("name", ["Max", "John", "Jane"]));
}

#[test]
fn exists_for_partial_request() {
    let set = filters().add_all("name", ["Max", "John", "Jane"]);
    assert!(set.exists_all("name", ["Max", "John"]));
}

#[test]
fn mixed_numeric_kinds_are_one_value() {
    let set = filters().add("age", 18u8).add("age", 18i64);
    assert_eq!(set.values("age").len(), 1);
    assert!(set.exists("age", 18.0));
}

#[test]
fn large_integers_stay_distinct_from_nearby_floats() {
    let exact = Number::I64(1 << 53);
    let next = Number::I64((1 << 53) + 1);
    let float = Number::F64(9_007_199_254_740_992.0);

    let set = filters().add_all("id", [exact, next]);
    assert!(FilterSet::ptr_eq(&set, &set.add("id", float)));

    let removed = set.remove("id", float);
    assert!(!removed.exists("id", float));
    assert!(!removed.exists("id", exact));
    assert!(removed.exists("id", next));
    assert_eq!(removed.values("id"), &[FilterValue::from(next)]);
}

// ============================================================================
// Projections
// ============================================================================

#[test]
fn partial_payload_and_values() {
    let set = filters().add("name", "Max").add_with("name", "^", ["J"]);

    let name: FieldFilters<'_, FilterValue> = set.field("name");
    assert_eq!(name.len(), 2);
    assert_eq!(name.get("^"), &[FilterValue::from("J")]);
    assert_eq!(
        name.iter().map(|(op, _)| op.as_str()).collect::<Vec<_>>(),
        vec!["=", "^"]
    );

    assert!(set.field("age").is_empty());
    assert!(set.values("age").is_empty());
    assert!(set.values_with("name", ">").is_empty());
}

#[test]
fn set_from_payload() {
    let payload: Payload<String, FilterValue> = serde_json::from_value(json!({
        "name": { "=": ["Max", "Max"], "^": [] }
    }))
    .unwrap();
    let set = FilterSet::from_payload(payload);
    assert_eq!(payload_json(&set), json!({ "name": { "=": ["Max"] } }));
}

#[test]
fn set_deserializes_from_query_shape() {
    let set: FilterSet = serde_json::from_str(r#"{"age":{">":[18]},"active":{"=":[true]}}"#)
        .unwrap();
    assert!(set.exists_with("age", ">", [18]));
    assert!(set.exists("active", true));
}

#[test]
fn payload_collects_from_triples() {
    let payload: Payload<String, FilterValue> = [
        ("name", "=", "Max"),
        ("name", "=", "Max"),
        ("name", "^", "J"),
    ]
    .into_iter()
    .map(|(f, op, v)| (f.to_string(), Operator::from(op), FilterValue::from(v)))
    .collect();

    let set = filters().attach(payload);
    assert_eq!(
        payload_json(&set),
        json!({ "name": { "=": ["Max"], "^": ["J"] } })
    );
}
