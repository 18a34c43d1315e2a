//! Request types

use crate::pagination::PageToken;
use crate::types::{JsonObject, JsonValue, DATETIME_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};

/// Parent context key carrying the customer profile ids for a child stream
pub const PROFILE_LIST_KEY: &str = "customer_profile_id_list";

/// How a stream's requests are shaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestShape {
    /// Only the page size
    #[default]
    Plain,
    /// Analytics query carried in URL parameters (GET)
    AnalyticsQuery,
    /// Analytics query carried in a JSON body (POST)
    AnalyticsBody,
}

impl RequestShape {
    /// Check if requests carry fields, metrics and filters
    pub fn is_analytics(&self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// Sync window for `created_time` filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Inclusive start
    pub start: NaiveDateTime,
    /// End of the window, normally the time the run started
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Window from midnight of `start` to `end`
    pub fn from_start_date(start: NaiveDate, end: NaiveDateTime) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN),
            end,
        }
    }

    /// Render as a `created_time.in(..)` filter
    pub fn created_time_filter(&self) -> String {
        format!(
            "created_time.in({}..{})",
            self.start.format(DATETIME_FORMAT),
            self.end.format(DATETIME_FORMAT)
        )
    }
}

/// Per-page request context.
///
/// Built fresh for every page; only the request builder mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Configured profile id(s), overridden by the parent context
    pub customer_profile_id: Option<String>,
    /// Sync window
    pub date_range: Option<DateRange>,
    /// Pagination token for this page
    pub next_page_token: Option<PageToken>,
    /// Values inherited from a parent record
    pub parent_context: JsonObject,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configured profile id(s)
    #[must_use]
    pub fn with_customer_profile_id(mut self, id: Option<String>) -> Self {
        self.customer_profile_id = id;
        self
    }

    /// Set the sync window
    #[must_use]
    pub fn with_date_range(mut self, range: Option<DateRange>) -> Self {
        self.date_range = range;
        self
    }

    /// Set the inherited parent values
    #[must_use]
    pub fn with_parent_context(mut self, parent: JsonObject) -> Self {
        self.parent_context = parent;
        self
    }

    /// Copy of this context for the page identified by `token`
    #[must_use]
    pub fn for_page(&self, token: Option<PageToken>) -> Self {
        Self {
            next_page_token: token,
            ..self.clone()
        }
    }
}

/// Output of the request builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedRequest {
    /// Query parameters; keys may repeat
    pub params: Vec<(String, String)>,
    /// JSON body for POST streams
    pub body: Option<JsonValue>,
}

impl PreparedRequest {
    /// All values of a query parameter
    pub fn param_values(&self, key: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value of a query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.param_values(key).into_iter().next()
    }
}
