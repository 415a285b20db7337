//! Tests for record module

use super::*;
use crate::types::JsonObject;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// ============================================================================
// ItemRecord Tests
// ============================================================================

#[test]
fn test_record_id_from_string_field() {
    let record = ItemRecord::new(object(json!({"id": "7", "name": "Alice"})), "id");
    assert_eq!(record.id(), Some("7".to_string()));
    assert!(!record.is_updated());
    assert!(record.has_id("7"));
}

#[test]
fn test_record_id_from_number_field() {
    let record = ItemRecord::new(object(json!({"uid": 42})), "uid");
    assert_eq!(record.id(), Some("42".to_string()));
    assert_eq!(record.id_field(), "uid");
}

#[test]
fn test_record_without_id() {
    let record = ItemRecord::new(object(json!({"name": "Alice"})), "id");
    assert_eq!(record.id(), None);
    assert!(!record.has_id(""));
}

#[test]
fn test_merge_overlays_fields() {
    let mut record = ItemRecord::new(object(json!({"a": 1, "b": 2})), "a");
    record.merge(object(json!({"b": 3, "c": 4})));

    assert_eq!(record.fields(), &object(json!({"a": 1, "b": 3, "c": 4})));
    assert!(record.is_updated());
}

#[test]
fn test_merge_empty_map_marks_updated() {
    let mut record = ItemRecord::new(object(json!({"a": 1, "b": 2})), "a");
    record.merge(JsonObject::new());

    assert_eq!(record.fields(), &object(json!({"a": 1, "b": 2})));
    assert!(record.is_updated());
}

#[test]
fn test_merge_keeps_field_order() {
    let mut record = ItemRecord::new(object(json!({"id": "1", "v": "a"})), "id");
    record.merge(object(json!({"extra": "x", "v": "b"})));

    let keys: Vec<&str> = record.keys().collect();
    assert_eq!(keys, vec!["id", "v", "extra"]);
}

#[test]
fn test_same_as_ignores_other_fields() {
    let a = ItemRecord::new(object(json!({"id": "1", "v": "a"})), "id");
    let b = ItemRecord::new(object(json!({"id": "1", "v": "zzz", "more": true})), "id");
    let c = ItemRecord::new(object(json!({"id": "2", "v": "a"})), "id");

    assert!(a.same_as(&b));
    assert_eq!(a, b);
    assert!(!a.same_as(&c));
    assert_ne!(a, c);
}

#[test]
fn test_records_without_id_are_never_equal() {
    let a = ItemRecord::new(object(json!({"v": "a"})), "id");
    let b = ItemRecord::new(object(json!({"v": "a"})), "id");
    assert!(!a.same_as(&b));
}

#[test]
fn test_record_serializes_fields_only() {
    let mut record = ItemRecord::new(object(json!({"id": "1"})), "id");
    record.merge(object(json!({"name": "n"})));
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value, json!({"id": "1", "name": "n"}));
}

// ============================================================================
// RecordStore Tests
// ============================================================================

#[test]
fn test_store_push_and_lookup() {
    let mut store = RecordStore::new();
    assert!(store.is_empty());

    let row = store.push(ItemRecord::new(object(json!({"id": "1"})), "id"));
    assert_eq!(row, 0);
    let row = store.push(ItemRecord::new(object(json!({"id": "2", "v": "b"})), "id"));
    assert_eq!(row, 1);

    assert_eq!(store.len(), 2);
    assert_eq!(store.position_by_id("2"), Some(1));
    assert_eq!(store.value(1, "v"), Some(&json!("b")));
    assert_eq!(store.value(5, "v"), None);
    assert!(store.find_by_id("3").is_none());
}

#[test]
fn test_store_duplicate_ids_resolve_to_first() {
    let mut store = RecordStore::new();
    store.push(ItemRecord::new(object(json!({"id": "1", "v": "first"})), "id"));
    store.push(ItemRecord::new(object(json!({"id": "1", "v": "second"})), "id"));

    assert_eq!(store.len(), 2);
    assert_eq!(store.position_by_id("1"), Some(0));
    assert_eq!(
        store.find_by_id("1").and_then(|r| r.get("v")),
        Some(&json!("first"))
    );
}

#[test]
fn test_store_clear() {
    let mut store = RecordStore::new();
    store.push(ItemRecord::new(object(json!({"id": "1"})), "id"));
    store.clear();
    assert!(store.is_empty());
    assert_eq!(store.iter().count(), 0);
}
