//! Tests for the stream catalog

use super::*;
use crate::error::Error;
use crate::pagination::PaginationConfig;
use crate::process::ProcessorKind;
use crate::request::RequestShape;
use crate::types::{JsonObject, Method};
use serde_json::json;
use std::collections::HashSet;

fn object(value: serde_json::Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_catalog_streams() {
    let catalog = catalog();
    assert_eq!(
        catalog.names(),
        vec!["customer_profiles", "customer_tags", "post_analytics"]
    );
    assert!(Catalog::new(catalog.streams().to_vec()).is_ok());
}

#[test]
fn test_customer_profiles_definition() {
    let catalog = catalog();
    let def = catalog.get("customer_profiles").unwrap();
    assert_eq!(def.path, "/metadata/customer");
    assert_eq!(def.method, Method::GET);
    assert_eq!(def.pagination, PaginationConfig::None);
    assert_eq!(def.request, RequestShape::Plain);
    assert!(!def.is_child());
}

#[test]
fn test_post_analytics_definition() {
    let catalog = catalog();
    let def = catalog.get("post_analytics").unwrap();
    assert_eq!(def.path, "/analytics/posts");
    assert_eq!(def.method, Method::POST);
    assert_eq!(def.primary_keys, vec!["guid"]);
    assert!(def.replication_key.is_none());
    assert!(def.pagination.is_guid_cursor());
    assert_eq!(def.request, RequestShape::AnalyticsBody);
    assert_eq!(def.processor, ProcessorKind::PostAnalytics);
    assert_eq!(def.records_path, "$.data[*]");
    assert_eq!(def.parent.as_ref().unwrap().stream, "customer_profiles");
    assert_eq!(def.key_properties(), json!(["guid"]));
}

#[test]
fn test_roots_and_children() {
    let catalog = catalog();
    let roots: Vec<&str> = catalog.roots().map(|s| s.name.as_str()).collect();
    assert_eq!(roots, vec!["customer_profiles", "customer_tags"]);

    let children: Vec<&str> = catalog
        .children_of("customer_profiles")
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(children, vec!["post_analytics"]);
    assert_eq!(catalog.children_of("customer_tags").count(), 0);
}

#[test]
fn test_select_all_and_subset() {
    let catalog = catalog();
    assert_eq!(catalog.select(&[]).unwrap().len(), 3);

    let selected = catalog.select(&["post_analytics".to_string()]).unwrap();
    assert!(selected.contains("post_analytics"));
    assert!(catalog.is_needed("customer_profiles", &selected));
    assert!(!catalog.is_needed("customer_tags", &selected));
}

#[test]
fn test_select_unknown_stream() {
    let catalog = catalog();
    let err = catalog.select(&["tweets".to_string()]).unwrap_err();
    assert!(matches!(err, Error::StreamNotFound { stream } if stream == "tweets"));
}

#[test]
fn test_catalog_rejects_bad_definitions() {
    let duplicate = vec![
        StreamDefinition::get("a", "/a"),
        StreamDefinition::get("a", "/b"),
    ];
    assert!(Catalog::new(duplicate).is_err());

    let orphan = vec![StreamDefinition::get("child", "/c")
        .with_parent(ParentLink::new("missing", "id", "ids"))];
    assert!(Catalog::new(orphan).is_err());

    let selected: HashSet<String> = HashSet::new();
    assert!(!catalog().is_needed("customer_tags", &selected));
}

#[test]
fn test_parent_link_context() {
    let link = ParentLink::customer_profiles();

    let context = link
        .context_from(&object(json!({"customer_profile_id": 42, "name": "x"})))
        .unwrap();
    assert_eq!(context.get("customer_profile_id_list"), Some(&json!(42)));
    assert_eq!(context.len(), 1);

    assert!(link.context_from(&object(json!({"name": "x"}))).is_none());
    assert!(link
        .context_from(&object(json!({"customer_profile_id": null})))
        .is_none());
}

#[test]
fn test_definition_builder_defaults() {
    let def = StreamDefinition::post("custom", "/custom")
        .with_replication_key("created_time")
        .with_records_path("$.items[*]");
    assert_eq!(def.method, Method::POST);
    assert_eq!(def.replication_key.as_deref(), Some("created_time"));
    assert_eq!(def.records_path, "$.items[*]");
    assert_eq!(def.processor, ProcessorKind::Passthrough);
    assert!(def.computed_fields.is_empty());
}
