//! Request construction
//!
//! Turns a stream definition, a per-page [`RequestContext`] and the stream's
//! field set into query parameters and an optional JSON body. No I/O happens
//! here.

mod builder;
mod types;

pub use builder::{build, PAGE_LIMIT};
pub use types::{DateRange, PreparedRequest, RequestContext, RequestShape, PROFILE_LIST_KEY};

#[cfg(test)]
mod tests;
