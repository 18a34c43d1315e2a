//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use super::strategies::{BodyPagePaginator, GuidCursorPaginator, NextPagePaginator, NoPaginator};
use crate::error::{Error, Result};
use crate::http::HttpResponse;

/// Token identifying the page to request next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// Guid of the last record seen; the next page holds greater guids
    Guid(String),
    /// Page number carried in the request body
    Page(u32),
    /// Opaque next-page value taken from the response
    Next(String),
}

impl PageToken {
    /// The guid cursor, if this is one
    pub fn as_guid(&self) -> Option<&str> {
        match self {
            Self::Guid(guid) => Some(guid),
            _ => None,
        }
    }

    /// The page number, if this is one
    pub fn as_page(&self) -> Option<u32> {
        match self {
            Self::Page(page) => Some(*page),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guid(guid) => write!(f, "guid:{guid}"),
            Self::Page(page) => write!(f, "page:{page}"),
            Self::Next(next) => write!(f, "next:{next}"),
        }
    }
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaginationConfig {
    /// Single page
    #[default]
    None,

    /// Cursor on the guid of the last record of each page
    GuidCursor {
        /// Cursor to start from
        start: Option<String>,
    },

    /// `paging.current_page` / `paging.total_pages` in the response body
    BodyPage,

    /// Next-page token from a body path, falling back to a header
    NextPage {
        /// Dot-notation path in the response body
        path: String,
        /// Response header name
        header: String,
    },
}

impl PaginationConfig {
    /// Guid cursor pagination from the beginning
    pub fn guid_cursor() -> Self {
        Self::GuidCursor { start: None }
    }

    /// Next-page pagination using `$.next_page` and `X-Next-Page`
    pub fn next_page() -> Self {
        Self::NextPage {
            path: "$.next_page".to_string(),
            header: "X-Next-Page".to_string(),
        }
    }

    /// Resolve the configured strategy
    pub fn build(&self) -> Box<dyn Paginator> {
        match self {
            Self::None => Box::new(NoPaginator),
            Self::GuidCursor { start } => Box::new(GuidCursorPaginator::new(start.clone())),
            Self::BodyPage => Box::new(BodyPagePaginator),
            Self::NextPage { path, header } => {
                Box::new(NextPagePaginator::new(path.clone(), header.clone()))
            }
        }
    }

    /// Check if this strategy cursors on record guids
    pub fn is_guid_cursor(&self) -> bool {
        matches!(self, Self::GuidCursor { .. })
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync + std::fmt::Debug {
    /// Token to send with the first request
    fn initial_token(&self) -> Option<PageToken>;

    /// Compute the token for the page after `response`.
    ///
    /// `None` means there are no further pages. A body that cannot be
    /// parsed is an error, never a silent stop.
    fn next_token(&self, response: &HttpResponse) -> Result<Option<PageToken>>;
}

/// Tracks pagination progress for one run of a stream
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Token to send with the next request
    pub token: Option<PageToken>,
    /// Pages fetched so far
    pub pages: u32,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Start a new run
    pub fn start(paginator: &dyn Paginator) -> Self {
        Self {
            token: paginator.initial_token(),
            pages: 0,
            done: false,
        }
    }

    /// Record a fetched page and move to the next token.
    ///
    /// Returns true while more pages remain.
    pub fn advance(&mut self, paginator: &dyn Paginator, response: &HttpResponse) -> Result<bool> {
        self.pages += 1;
        match paginator.next_token(response)? {
            None => {
                self.token = None;
                self.done = true;
            }
            Some(next) => {
                if self.token.as_ref() == Some(&next) {
                    return Err(Error::PaginationLoop {
                        token: next.to_string(),
                    });
                }
                self.token = Some(next);
            }
        }
        Ok(!self.done)
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.token = None;
        self.done = true;
    }
}
