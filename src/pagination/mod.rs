//! Pagination module
//!
//! Supports: no pagination, guid cursor, page number in the response body,
//! next-page token from a body path or response header
//!
//! # Overview
//!
//! Each stream declares a [`PaginationConfig`]. It is resolved once into a
//! [`Paginator`] that computes the next [`PageToken`] from a response, while
//! [`PaginationState`] tracks the token to send and detects exhaustion.

mod strategies;
mod types;

pub use strategies::{BodyPagePaginator, GuidCursorPaginator, NextPagePaginator, NoPaginator};
pub use types::{PageToken, PaginationConfig, PaginationState, Paginator};

#[cfg(test)]
mod tests;
