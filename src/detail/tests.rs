//! Tests for detail module

use super::*;
use crate::decode::{JsonDecoder, XmlDecoder};
use crate::error::Error;
use crate::record::{ItemRecord, RecordStore};
use crate::types::AcceptFormat;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn store_of(values: Vec<Value>) -> RecordStore {
    let mut store = RecordStore::new();
    for value in values {
        if let Value::Object(map) = value {
            store.push(ItemRecord::new(map, "id"));
        }
    }
    store
}

// ============================================================================
// DetailFetcher Tests
// ============================================================================

#[test]
fn test_request_carries_id_and_query() {
    let fetcher = DetailFetcher::new("id");
    let request = fetcher.request("42", AcceptFormat::Xml, &["name".to_string()]);
    assert_eq!(request.id, "42");
    assert_eq!(request.accept, AcceptFormat::Xml);
    assert_eq!(request.fields, vec!["name".to_string()]);
}

#[test]
fn test_apply_merges_onto_existing_record() {
    let mut store = store_of(vec![json!({"id": "1", "v": "a"}), json!({"id": "2", "v": "b"})]);
    let fetcher = DetailFetcher::new("id");

    let merge = fetcher
        .apply(&mut store, &JsonDecoder::new(), r#"{"id": "2", "v": "b", "extra": "x"}"#)
        .unwrap();

    assert_eq!(
        merge,
        DetailMerge {
            id: "2".to_string(),
            row: 1,
            inserted: false
        }
    );
    assert_eq!(store.len(), 2);
    let record = store.get(1).unwrap();
    assert!(record.is_updated());
    assert_eq!(
        Value::Object(record.fields().clone()),
        json!({"id": "2", "v": "b", "extra": "x"})
    );
    assert!(!store.get(0).unwrap().is_updated());
}

#[test]
fn test_apply_appends_when_absent() {
    let mut store = store_of(vec![json!({"id": "1"})]);
    let fetcher = DetailFetcher::new("id");

    let merge = fetcher
        .apply(&mut store, &JsonDecoder::new(), r#"{"id": 9, "name": "new"}"#)
        .unwrap();

    assert!(merge.inserted);
    assert_eq!(merge.row, 1);
    assert_eq!(merge.id, "9");
    let record = store.get(1).unwrap();
    assert!(record.is_updated());
    assert_eq!(record.id(), Some("9".to_string()));
}

#[test]
fn test_apply_requires_id_in_payload() {
    let mut store = store_of(vec![json!({"id": "1"})]);
    let fetcher = DetailFetcher::new("id");

    let err = fetcher
        .apply(&mut store, &JsonDecoder::new(), r#"{"name": "anonymous"}"#)
        .unwrap_err();

    assert!(matches!(err, Error::MissingId { .. }));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_apply_xml_payload_with_numeric_id() {
    let mut store = store_of(vec![json!({"id": "5", "v": "a"})]);
    let fetcher = DetailFetcher::new("id");

    let merge = fetcher
        .apply(
            &mut store,
            &XmlDecoder::new(),
            "<response><id>5</id><v>full</v></response>",
        )
        .unwrap();

    assert_eq!(merge.row, 0);
    assert_eq!(store.value(0, "v"), Some(&json!("full")));
}

#[test]
fn test_needs_fetch() {
    let mut store = store_of(vec![json!({"id": "1"}), json!({"id": "2"})]);
    let fetcher = DetailFetcher::new("id");
    store.get_mut(1).unwrap().merge(crate::types::JsonObject::new());

    assert!(fetcher.needs_fetch(&store, "1"));
    assert!(!fetcher.needs_fetch(&store, "2"));
    assert!(fetcher.needs_fetch(&store, "missing"));
}

// ============================================================================
// DetailFilterView Tests
// ============================================================================

#[test]
fn test_view_filters_selected_id() {
    let store = store_of(vec![
        json!({"id": "1", "v": "a"}),
        json!({"id": "2", "v": "b"}),
        json!({"id": "3", "v": "c"}),
    ]);
    let mut filter = DetailFilterView::new();
    filter.select(Some("2".to_string()));
    filter.invalidate(&store);

    let view = filter.project(&store);
    assert_eq!(view.len(), 1);
    assert_eq!(view.selected(), Some("2"));
    assert_eq!(view.map_to_source(0), Some(1));
    assert_eq!(view.value(0, "v"), Some(&json!("b")));
    assert_eq!(view.first().and_then(ItemRecord::id), Some("2".to_string()));
    assert!(view.get(1).is_none());
}

#[test]
fn test_view_empty_without_selection() {
    let store = store_of(vec![json!({"id": "1"})]);
    let mut filter = DetailFilterView::new();
    filter.invalidate(&store);

    assert!(filter.is_empty());
    assert!(filter.project(&store).first().is_none());
}

#[test]
fn test_view_requires_invalidate_after_change() {
    let mut store = store_of(vec![json!({"id": "1"})]);
    let mut filter = DetailFilterView::new();
    filter.select(Some("2".to_string()));
    filter.invalidate(&store);
    assert!(filter.is_empty());

    store.push(ItemRecord::new(
        json!({"id": "2"}).as_object().cloned().unwrap(),
        "id",
    ));
    assert!(filter.is_empty());

    filter.invalidate(&store);
    assert_eq!(filter.source_rows(), &[1]);
}

#[test]
fn test_view_shows_duplicates() {
    let store = store_of(vec![json!({"id": "1", "v": "a"}), json!({"id": "1", "v": "b"})]);
    let mut filter = DetailFilterView::new();
    filter.select(Some("1".to_string()));
    filter.invalidate(&store);

    let view = filter.project(&store);
    let values: Vec<&Value> = view.iter().filter_map(|r| r.get("v")).collect();
    assert_eq!(values, vec![&json!("a"), &json!("b")]);
}

#[test]
fn test_view_does_not_mutate_store() {
    let store = store_of(vec![json!({"id": "1"}), json!({"id": "2"})]);
    let mut filter = DetailFilterView::new();
    filter.select(Some("1".to_string()));
    filter.invalidate(&store);
    assert_eq!(store.len(), 2);
}
