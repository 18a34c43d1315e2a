//! Tests for the schema module

use super::*;
use crate::error::Error;
use crate::streams::{self, StreamDefinition};
use pretty_assertions::assert_eq;
use serde_json::json;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[test]
fn test_extract_fields_and_metrics() {
    let schema = json!({
        "properties": {
            "guid": {},
            "metrics": {"properties": {"likes": {}, "shares": {}}}
        }
    });

    let set = extract_fields("post_analytics", &schema).unwrap();
    assert_eq!(set.fields, names(&["guid"]));
    assert_eq!(set.metrics, names(&["likes", "shares"]));
}

#[test]
fn test_extract_preserves_schema_order() {
    let schema = json!({
        "properties": {
            "text": {},
            "guid": {},
            "metrics": {"properties": {"z": {}, "a": {}}},
            "created_time": {}
        }
    });

    let set = extract_fields("s", &schema).unwrap();
    assert_eq!(set.fields, names(&["text", "guid", "created_time"]));
    assert_eq!(set.metrics, names(&["z", "a"]));
}

#[test]
fn test_extract_is_idempotent() {
    let schema = json!({
        "properties": {
            "guid": {},
            "text": {},
            "metrics": {"properties": {"likes": {}}}
        }
    });

    let first = extract_fields("s", &schema).unwrap();
    let second = extract_fields("s", &schema).unwrap();
    assert_eq!(first, second);
    assert!(!first.fields.contains(&"metrics".to_string()));
}

#[test]
fn test_extract_from_response_envelope() {
    let schema = json!({
        "properties": {
            "paging": {"properties": {"current_page": {}}},
            "data": {
                "type": "array",
                "items": {
                    "properties": {
                        "guid": {},
                        "metrics": {"properties": {"lifetime.impressions": {}}}
                    }
                }
            }
        }
    });

    let set = extract_fields("s", &schema).unwrap();
    assert_eq!(set.fields, names(&["guid"]));
    assert_eq!(set.metrics, names(&["lifetime.impressions"]));
}

#[test]
fn test_extract_tolerates_missing_keys() {
    let set = extract_fields("s", &json!({})).unwrap();
    assert!(set.is_empty());

    let set = extract_fields("s", &json!({"properties": {"metrics": {}}})).unwrap();
    assert!(set.fields.is_empty());
    assert!(set.metrics.is_empty());

    let set = extract_fields("s", &json!({"properties": {"metrics": {"type": "object"}}})).unwrap();
    assert!(set.metrics.is_empty());
}

#[test]
fn test_extract_rejects_non_object_schema() {
    for schema in [json!([]), json!("schema"), json!(null), json!(1)] {
        let err = extract_fields("post_analytics", &schema).unwrap_err();
        assert!(matches!(err, Error::SchemaParse { ref stream, .. } if stream == "post_analytics"));
    }
}

#[test]
fn test_extract_rejects_non_object_properties() {
    let err = extract_fields("s", &json!({"properties": ["guid"]})).unwrap_err();
    assert!(matches!(err, Error::SchemaParse { .. }));
}

#[test]
fn test_field_metric_set_helpers() {
    let set = FieldMetricSet::new(names(&["guid", "text", "start_time"]), names(&["a", "b"]))
        .without_fields(&["start_time"]);
    assert_eq!(set.fields_csv(), "guid,text");
    assert_eq!(set.metrics_csv(), "a,b");
}

#[test]
fn test_record_schema_unwraps_envelope() {
    let wrapped = json!({"properties": {"data": {"items": {"properties": {"guid": {}}}}}});
    assert_eq!(record_schema(&wrapped), &json!({"properties": {"guid": {}}}));

    let plain = json!({"properties": {"guid": {}}});
    assert_eq!(record_schema(&plain), &plain);
}

// ============================================================================
// Cache Tests
// ============================================================================

#[test]
fn test_cache_loads_packaged_post_analytics_schema() {
    let catalog = streams::catalog();
    let def = catalog.get("post_analytics").unwrap();
    let mut cache = SchemaCache::new();

    let schema = cache.get_or_load(def).unwrap();
    assert!(schema.fields.fields.contains(&"guid".to_string()));
    assert!(schema.fields.fields.contains(&"text".to_string()));
    assert!(!schema.fields.fields.contains(&"start_time".to_string()));
    assert!(!schema.fields.fields.contains(&"metrics".to_string()));
    assert!(schema
        .fields
        .metrics
        .contains(&"lifetime.impressions".to_string()));
    assert!(schema.record["properties"]["start_time"].is_object());
}

#[test]
fn test_cache_returns_same_entry() {
    let catalog = streams::catalog();
    let def = catalog.get("customer_tags").unwrap();
    let mut cache = SchemaCache::new();

    let first = cache.get_or_load(def).unwrap();
    let second = cache.get_or_load(def).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_does_not_store_failures() {
    let def = StreamDefinition::get("broken", "/broken").with_schema("[1, 2");
    let mut cache = SchemaCache::new();

    let err = cache.get_or_load(&def).unwrap_err();
    assert!(matches!(err, Error::SchemaParse { .. }));
    assert!(cache.is_empty());
}
