//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{PageToken, Paginator};
use crate::decode::{extract_jsonpath, extract_path_value};
use crate::error::{Error, Result};
use crate::http::HttpResponse;
use serde_json::Value;

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn initial_token(&self) -> Option<PageToken> {
        None
    }

    fn next_token(&self, _response: &HttpResponse) -> Result<Option<PageToken>> {
        Ok(None)
    }
}

// ============================================================================
// Guid Cursor Pagination
// ============================================================================

/// Cursor on the guid of the last record in `data`.
///
/// Only an empty page ends pagination; a short page still triggers one
/// more request. A body without a `data` array is a parse error.
#[derive(Debug, Clone, Default)]
pub struct GuidCursorPaginator {
    /// Cursor to start from
    pub start: Option<String>,
}

impl GuidCursorPaginator {
    /// Create a new guid cursor paginator
    pub fn new(start: Option<String>) -> Self {
        Self { start }
    }
}

impl Paginator for GuidCursorPaginator {
    fn initial_token(&self) -> Option<PageToken> {
        self.start.clone().map(PageToken::Guid)
    }

    fn next_token(&self, response: &HttpResponse) -> Result<Option<PageToken>> {
        let body = response.json()?;
        let records = match body.get("data") {
            None | Some(Value::Null) => {
                return Err(Error::response_parse("missing 'data' array"));
            }
            Some(Value::Array(records)) => records,
            Some(_) => return Err(Error::response_parse("'data' is not an array")),
        };

        let Some(last) = records.last() else {
            return Ok(None);
        };

        match last.get("guid") {
            Some(Value::String(guid)) if guid.is_empty() => Ok(None),
            Some(Value::String(guid)) => Ok(Some(PageToken::Guid(guid.clone()))),
            Some(Value::Number(n)) => Ok(Some(PageToken::Guid(n.to_string()))),
            _ => Err(Error::response_parse(
                "last record of the page has no 'guid'",
            )),
        }
    }
}

// ============================================================================
// Body Page Pagination
// ============================================================================

/// Page numbers from `paging.current_page` and `paging.total_pages`
#[derive(Debug, Clone, Default)]
pub struct BodyPagePaginator;

impl BodyPagePaginator {
    fn read_page_field(body: &Value, path: &str) -> Result<u64> {
        extract_path_value(body, path)
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::response_parse(format!("missing or invalid '{path}'")))
    }
}

impl Paginator for BodyPagePaginator {
    fn initial_token(&self) -> Option<PageToken> {
        Some(PageToken::Page(1))
    }

    fn next_token(&self, response: &HttpResponse) -> Result<Option<PageToken>> {
        let body = response.json()?;
        let current = Self::read_page_field(&body, "paging.current_page")?;
        let total = Self::read_page_field(&body, "paging.total_pages")?;

        if current < total {
            let next = u32::try_from(current + 1)
                .map_err(|_| Error::response_parse(format!("page {current} out of range")))?;
            Ok(Some(PageToken::Page(next)))
        } else {
            Ok(None)
        }
    }
}

// ============================================================================
// Next Page Pagination
// ============================================================================

/// Next-page token from a body path, or from a response header when the
/// body carries none
#[derive(Debug, Clone)]
pub struct NextPagePaginator {
    /// Dot-notation path in the response body
    pub path: String,
    /// Response header name
    pub header: String,
}

impl NextPagePaginator {
    /// Create a new next page paginator
    pub fn new(path: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            header: header.into(),
        }
    }
}

impl Paginator for NextPagePaginator {
    fn initial_token(&self) -> Option<PageToken> {
        None
    }

    fn next_token(&self, response: &HttpResponse) -> Result<Option<PageToken>> {
        let body = response.json()?;

        let from_body = extract_jsonpath(&body, &self.path).filter(|s| !s.is_empty());
        let next = from_body.or_else(|| {
            response
                .header(&self.header)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        });

        Ok(next.map(PageToken::Next))
    }
}
