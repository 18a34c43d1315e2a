//! Tests for request construction

use super::*;
use crate::error::Error;
use crate::pagination::{PageToken, PaginationConfig};
use crate::schema::FieldMetricSet;
use crate::streams::{catalog, StreamDefinition};
use crate::types::JsonObject;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

fn fields() -> FieldMetricSet {
    FieldMetricSet::new(
        vec!["guid".to_string(), "text".to_string()],
        vec!["lifetime.likes".to_string()],
    )
}

fn range() -> DateRange {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 1)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();
    DateRange::from_start_date(start, end)
}

fn analytics_context() -> RequestContext {
    RequestContext::new()
        .with_customer_profile_id(Some("111".to_string()))
        .with_date_range(Some(range()))
}

fn post_analytics() -> StreamDefinition {
    catalog().get("post_analytics").cloned().unwrap()
}

// ============================================================================
// Plain Requests
// ============================================================================

#[test]
fn test_plain_get_sets_limit_only() {
    let def = StreamDefinition::get("customer_tags", "/metadata/customer/tags");
    let mut ctx = RequestContext::new();
    let request = build(&def, &mut ctx, &FieldMetricSet::default()).unwrap();

    assert_eq!(request.params, vec![("limit".to_string(), "100".to_string())]);
    assert!(request.body.is_none());
}

#[test]
fn test_plain_get_merges_page_token() {
    let def = StreamDefinition::get("paged", "/paged");
    let mut ctx = RequestContext::new().for_page(Some(PageToken::Page(4)));
    let request = build(&def, &mut ctx, &FieldMetricSet::default()).unwrap();
    assert_eq!(request.param("page"), Some("4"));
    assert_eq!(request.param("limit"), Some("100"));
}

// ============================================================================
// Analytics Query (GET)
// ============================================================================

#[test]
fn test_analytics_query_params() {
    let def = StreamDefinition::get("analytics", "/analytics/profiles")
        .with_request_shape(RequestShape::AnalyticsQuery);
    let mut ctx = analytics_context();
    let request = build(&def, &mut ctx, &fields()).unwrap();

    assert_eq!(request.param("limit"), Some("100"));
    assert_eq!(request.param("fields"), Some("guid,text"));
    assert_eq!(request.param("metrics"), Some("lifetime.likes"));
    assert_eq!(
        request.param_values("filters"),
        vec![
            "customer_profile_id.eq(111)",
            "created_time.in(2024-01-01T00:00:00..2024-02-01T12:30:00)"
        ]
    );
    assert_eq!(request.param("sort"), Some("created_time:asc"));
    assert!(request.body.is_none());
}

#[test]
fn test_analytics_query_guid_cursor_sorts_by_created_time() {
    let def = StreamDefinition::get("analytics", "/analytics/profiles")
        .with_request_shape(RequestShape::AnalyticsQuery)
        .with_pagination(PaginationConfig::guid_cursor());
    let mut ctx = analytics_context().for_page(Some(PageToken::Guid("g9".to_string())));
    let request = build(&def, &mut ctx, &fields()).unwrap();

    assert_eq!(request.param_values("sort"), vec!["created_time:asc"]);
    assert_eq!(request.param_values("filters")[2], "guid.gt(g9)");
}

// ============================================================================
// Analytics Body (POST)
// ============================================================================

#[test]
fn test_analytics_body_first_page() {
    let def = post_analytics();
    let mut ctx = analytics_context();
    let request = build(&def, &mut ctx, &fields()).unwrap();

    assert!(request.params.is_empty());
    assert_eq!(
        request.body,
        Some(json!({
            "fields": ["guid", "text"],
            "metrics": ["lifetime.likes"],
            "filters": [
                "customer_profile_id.eq(111)",
                "created_time.in(2024-01-01T00:00:00..2024-02-01T12:30:00)"
            ],
            "limit": 100,
            "page": 1,
            "sort": ["guid:asc"]
        }))
    );
}

#[test]
fn test_analytics_body_guid_cursor() {
    let def = post_analytics();
    let mut ctx = analytics_context().for_page(Some(PageToken::Guid("b".to_string())));
    let body = build(&def, &mut ctx, &fields()).unwrap().body.unwrap();

    assert_eq!(
        body["filters"],
        json!([
            "customer_profile_id.eq(111)",
            "created_time.in(2024-01-01T00:00:00..2024-02-01T12:30:00)",
            "guid.gt(b)"
        ])
    );
    assert_eq!(body["sort"], json!(["guid:asc"]));
    assert_eq!(body["page"], json!(1));
}

#[test]
fn test_analytics_body_page_token() {
    let def = StreamDefinition::post("paged_analytics", "/analytics/posts")
        .with_request_shape(RequestShape::AnalyticsBody)
        .with_pagination(PaginationConfig::BodyPage);
    let mut ctx = analytics_context().for_page(Some(PageToken::Page(3)));
    let body = build(&def, &mut ctx, &fields()).unwrap().body.unwrap();

    assert_eq!(body["page"], json!(3));
    assert_eq!(body["sort"], json!(["created_time:asc"]));
    assert_eq!(body["filters"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Parent Context
// ============================================================================

#[test]
fn test_parent_profile_list_overrides_config() {
    let def = post_analytics();
    let mut parent = JsonObject::new();
    parent.insert(PROFILE_LIST_KEY.to_string(), json!(987));
    let mut ctx = analytics_context().with_parent_context(parent);

    let body = build(&def, &mut ctx, &fields()).unwrap().body.unwrap();
    assert_eq!(body["filters"][0], json!("customer_profile_id.eq(987)"));
    assert!(!ctx.parent_context.contains_key(PROFILE_LIST_KEY));
    assert_eq!(ctx.customer_profile_id.as_deref(), Some("987"));
}

#[test]
fn test_parent_profile_list_array() {
    let def = post_analytics();
    let mut parent = JsonObject::new();
    parent.insert(PROFILE_LIST_KEY.to_string(), json!([1, "2"]));
    let mut ctx = analytics_context().with_parent_context(parent);

    let body = build(&def, &mut ctx, &fields()).unwrap().body.unwrap();
    assert_eq!(body["filters"][0], json!("customer_profile_id.eq(1,2)"));
}

#[test]
fn test_invalid_parent_profile_list() {
    let def = post_analytics();
    let mut parent = JsonObject::new();
    parent.insert(PROFILE_LIST_KEY.to_string(), json!({"id": 1}));
    let mut ctx = analytics_context().with_parent_context(parent);

    let err = build(&def, &mut ctx, &fields()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
}

// ============================================================================
// Missing Inputs
// ============================================================================

#[test]
fn test_missing_profile_id() {
    let def = post_analytics();
    let mut ctx = RequestContext::new().with_date_range(Some(range()));
    let err = build(&def, &mut ctx, &fields()).unwrap_err();
    assert!(
        matches!(err, Error::MissingConfigField { ref field } if field == "customer_profile_id")
    );
}

#[test]
fn test_missing_start_date() {
    let def = post_analytics();
    let mut ctx = RequestContext::new().with_customer_profile_id(Some("1".to_string()));
    let err = build(&def, &mut ctx, &fields()).unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "start_date"));
}

#[test]
fn test_for_page_keeps_base_context() {
    let base = analytics_context();
    let page = base.for_page(Some(PageToken::Guid("x".to_string())));
    assert_eq!(page.customer_profile_id, base.customer_profile_id);
    assert_eq!(page.date_range, base.date_range);
    assert!(base.next_page_token.is_none());
}
