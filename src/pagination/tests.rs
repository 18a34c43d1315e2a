//! Tests for pagination module

use super::*;
use crate::error::Error;
use crate::http::HttpResponse;
use serde_json::json;

fn page(body: serde_json::Value) -> HttpResponse {
    HttpResponse::json_body(&body)
}

// ============================================================================
// PageToken Tests
// ============================================================================

#[test]
fn test_page_token_accessors() {
    let guid = PageToken::Guid("abc".to_string());
    assert_eq!(guid.as_guid(), Some("abc"));
    assert_eq!(guid.as_page(), None);

    let number = PageToken::Page(3);
    assert_eq!(number.as_page(), Some(3));
    assert_eq!(number.as_guid(), None);
}

#[test]
fn test_page_token_display() {
    assert_eq!(PageToken::Guid("g1".to_string()).to_string(), "guid:g1");
    assert_eq!(PageToken::Page(2).to_string(), "page:2");
    assert_eq!(PageToken::Next("xyz".to_string()).to_string(), "next:xyz");
}

// ============================================================================
// PaginationConfig Tests
// ============================================================================

#[test]
fn test_pagination_config_default() {
    assert_eq!(PaginationConfig::default(), PaginationConfig::None);
    assert!(!PaginationConfig::None.is_guid_cursor());
    assert!(PaginationConfig::guid_cursor().is_guid_cursor());
}

#[test]
fn test_pagination_config_next_page_defaults() {
    match PaginationConfig::next_page() {
        PaginationConfig::NextPage { path, header } => {
            assert_eq!(path, "$.next_page");
            assert_eq!(header, "X-Next-Page");
        }
        other => panic!("Expected NextPage, got {other:?}"),
    }
}

// ============================================================================
// NoPaginator Tests
// ============================================================================

#[test]
fn test_no_paginator() {
    let paginator = PaginationConfig::None.build();
    assert!(paginator.initial_token().is_none());

    let response = page(json!({"data": [{"id": 1}], "next_page": "2"}));
    assert!(paginator.next_token(&response).unwrap().is_none());
}

// ============================================================================
// GuidCursorPaginator Tests
// ============================================================================

#[test]
fn test_guid_cursor_uses_last_record() {
    let paginator = GuidCursorPaginator::default();
    assert!(paginator.initial_token().is_none());

    let response = page(json!({"data": [{"guid": "a"}, {"guid": "b"}]}));
    assert_eq!(
        paginator.next_token(&response).unwrap(),
        Some(PageToken::Guid("b".to_string()))
    );
}

#[test]
fn test_guid_cursor_short_page_continues() {
    let paginator = GuidCursorPaginator::default();
    let response = page(json!({"data": [{"guid": "c"}]}));
    assert_eq!(
        paginator.next_token(&response).unwrap(),
        Some(PageToken::Guid("c".to_string()))
    );
}

#[test]
fn test_guid_cursor_empty_page_stops() {
    let paginator = GuidCursorPaginator::default();
    assert!(paginator
        .next_token(&page(json!({"data": []})))
        .unwrap()
        .is_none());
}

#[test]
fn test_guid_cursor_missing_data_is_error() {
    let paginator = GuidCursorPaginator::default();
    assert!(matches!(
        paginator.next_token(&page(json!({"data": null}))),
        Err(Error::ResponseParse { .. })
    ));
    assert!(matches!(
        paginator.next_token(&page(json!({"error": "upstream glitch", "paging": {}}))),
        Err(Error::ResponseParse { .. })
    ));
}

#[test]
fn test_guid_cursor_empty_guid_stops() {
    let paginator = GuidCursorPaginator::default();
    let response = page(json!({"data": [{"guid": ""}]}));
    assert!(paginator.next_token(&response).unwrap().is_none());
}

#[test]
fn test_guid_cursor_numeric_guid() {
    let paginator = GuidCursorPaginator::default();
    let response = page(json!({"data": [{"guid": 42}]}));
    assert_eq!(
        paginator.next_token(&response).unwrap(),
        Some(PageToken::Guid("42".to_string()))
    );
}

#[test]
fn test_guid_cursor_start_token() {
    let paginator = PaginationConfig::GuidCursor {
        start: Some("g0".to_string()),
    }
    .build();
    assert_eq!(
        paginator.initial_token(),
        Some(PageToken::Guid("g0".to_string()))
    );
}

#[test]
fn test_guid_cursor_errors() {
    let paginator = GuidCursorPaginator::default();

    let missing_guid = page(json!({"data": [{"text": "no guid"}]}));
    assert!(matches!(
        paginator.next_token(&missing_guid),
        Err(Error::ResponseParse { .. })
    ));

    let not_array = page(json!({"data": {"guid": "a"}}));
    assert!(matches!(
        paginator.next_token(&not_array),
        Err(Error::ResponseParse { .. })
    ));

    let not_json = HttpResponse::ok("<html>");
    assert!(matches!(
        paginator.next_token(&not_json),
        Err(Error::ResponseParse { .. })
    ));
}

// ============================================================================
// BodyPagePaginator Tests
// ============================================================================

#[test]
fn test_body_page_continues_until_total() {
    let paginator = BodyPagePaginator;
    assert_eq!(paginator.initial_token(), Some(PageToken::Page(1)));

    let first = page(json!({"data": [], "paging": {"current_page": 1, "total_pages": 3}}));
    assert_eq!(
        paginator.next_token(&first).unwrap(),
        Some(PageToken::Page(2))
    );

    let last = page(json!({"data": [], "paging": {"current_page": 3, "total_pages": 3}}));
    assert!(paginator.next_token(&last).unwrap().is_none());
}

#[test]
fn test_body_page_missing_metadata() {
    let paginator = BodyPagePaginator;
    let response = page(json!({"data": [{"id": 1}]}));
    assert!(matches!(
        paginator.next_token(&response),
        Err(Error::ResponseParse { .. })
    ));

    let partial = page(json!({"paging": {"current_page": 1}}));
    assert!(paginator.next_token(&partial).is_err());
}

// ============================================================================
// NextPagePaginator Tests
// ============================================================================

#[test]
fn test_next_page_from_body() {
    let paginator = PaginationConfig::next_page().build();
    let response = page(json!({"data": [], "next_page": "tok-2"}))
        .with_header("X-Next-Page", "from-header");
    assert_eq!(
        paginator.next_token(&response).unwrap(),
        Some(PageToken::Next("tok-2".to_string()))
    );
}

#[test]
fn test_next_page_header_fallback() {
    let paginator = NextPagePaginator::new("$.next_page", "X-Next-Page");
    let response = page(json!({"data": []})).with_header("X-Next-Page", "tok-3");
    assert_eq!(
        paginator.next_token(&response).unwrap(),
        Some(PageToken::Next("tok-3".to_string()))
    );
}

#[test]
fn test_next_page_absent_stops() {
    let paginator = NextPagePaginator::new("$.next_page", "X-Next-Page");
    assert!(paginator
        .next_token(&page(json!({"data": [], "next_page": ""})))
        .unwrap()
        .is_none());
    assert!(paginator
        .next_token(&page(json!({"data": []})))
        .unwrap()
        .is_none());
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_state_walks_guid_pages() {
    let paginator = PaginationConfig::guid_cursor().build();
    let mut state = PaginationState::start(paginator.as_ref());
    assert!(state.token.is_none());
    assert!(!state.done);

    let more = state
        .advance(paginator.as_ref(), &page(json!({"data": [{"guid": "a"}, {"guid": "b"}]})))
        .unwrap();
    assert!(more);
    assert_eq!(state.token, Some(PageToken::Guid("b".to_string())));

    let more = state
        .advance(paginator.as_ref(), &page(json!({"data": [{"guid": "c"}]})))
        .unwrap();
    assert!(more);

    let more = state
        .advance(paginator.as_ref(), &page(json!({"data": []})))
        .unwrap();
    assert!(!more);
    assert!(state.done);
    assert!(state.token.is_none());
    assert_eq!(state.pages, 3);
}

#[test]
fn test_state_detects_repeated_token() {
    let paginator = PaginationConfig::guid_cursor().build();
    let mut state = PaginationState::start(paginator.as_ref());
    let response = page(json!({"data": [{"guid": "same"}]}));

    state.advance(paginator.as_ref(), &response).unwrap();
    let err = state.advance(paginator.as_ref(), &response).unwrap_err();
    assert!(matches!(err, Error::PaginationLoop { .. }));
}

#[test]
fn test_state_mark_done() {
    let paginator = PaginationConfig::BodyPage.build();
    let mut state = PaginationState::start(paginator.as_ref());
    assert_eq!(state.token, Some(PageToken::Page(1)));

    state.mark_done();
    assert!(state.done);
    assert!(state.token.is_none());
}
