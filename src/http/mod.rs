//! HTTP transport module
//!
//! Provides the [`Transport`] seam used by the orchestrator and the
//! reqwest-backed [`HttpClient`] that implements it.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: Bearer token via the auth module

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{HttpResponse, Transport};
