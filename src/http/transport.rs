//! Transport abstraction
//!
//! The orchestrator talks to the API only through [`Transport`], so the
//! fetch loop can be driven by the real HTTP client or by a scripted
//! transport in tests.

use super::client::RequestConfig;
use crate::error::{Error, Result};
use crate::types::Method;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// A fully-read HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: String,
}

impl HttpResponse {
    /// Create a 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Create a 200 response from a JSON value
    pub fn json_body(value: &Value) -> Self {
        Self::ok(value.to_string())
    }

    /// Add a response header
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Check if the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into an `HttpStatus` error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http_status(self.status, self.body))
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::response_parse(format!("Response body is not valid JSON: {e}")))
    }

    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Executes requests against the API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request and return the full response.
    ///
    /// `url` is either absolute or a path relative to the transport's base URL.
    async fn execute(&self, method: Method, url: &str, request: RequestConfig)
        -> Result<HttpResponse>;
}
