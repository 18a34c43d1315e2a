//! Tap configuration
//!
//! The configuration surface accepted by the tap: credentials, account
//! identifiers and the sync window, plus a few transport tuning knobs.
//! Loaded from a JSON file or an inline JSON string.

use crate::error::{Error, Result};
use crate::types::{OptionStringExt, DATETIME_FORMAT};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Default API host
pub const DEFAULT_API_URL: &str = "https://api.sproutsocial.com";

/// Default API version
pub const DEFAULT_API_VERSION: &str = "v1";

// ============================================================================
// Tap Config
// ============================================================================

/// Runtime configuration for the tap
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Bearer token used to authenticate against the API
    pub token_name: String,

    /// API version segment of the base URL
    #[serde(default = "default_version")]
    pub version: String,

    /// Sprout Social customer ID
    pub customer_id: String,

    /// Comma-separated customer profile IDs. Only needed when the
    /// profile IDs are not supplied by the `customer_profiles` stream.
    #[serde(default)]
    pub customer_profile_id: Option<String>,

    /// Company handle that is never obfuscated in post text
    #[serde(default)]
    pub company_name: Option<String>,

    /// Earliest record date to sync
    #[serde(default, deserialize_with = "deserialize_start_date")]
    pub start_date: Option<NaiveDate>,

    /// API host override (mostly for testing)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Maximum retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Client-side request rate limit
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_requests_per_second() -> u32 {
    10
}

impl TapConfig {
    /// Create a config with the required fields and defaults for the rest
    pub fn new(token: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            token_name: token.into(),
            version: default_version(),
            customer_id: customer_id.into(),
            customer_profile_id: None,
            company_name: None,
            start_date: None,
            api_url: default_api_url(),
            max_retries: default_max_retries(),
            requests_per_second: default_requests_per_second(),
            user_agent: None,
        }
    }

    /// Set the configured customer profile IDs
    #[must_use]
    pub fn with_customer_profile_id(mut self, ids: impl Into<String>) -> Self {
        self.customer_profile_id = Some(ids.into());
        self
    }

    /// Set the company handle exempt from obfuscation
    #[must_use]
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Set the sync start date
    #[must_use]
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Point the tap at a different API host
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Load and validate a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        Self::from_json_str(&content)
    }

    /// Load and validate a config from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load and validate a config from a JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::config("Config must be a JSON object"));
        }
        for field in ["token_name", "customer_id"] {
            if value.get(field).is_none() {
                return Err(Error::missing_field(field));
            }
        }
        let config: TapConfig = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field contents
    pub fn validate(&self) -> Result<()> {
        if self.token_name.trim().is_empty() {
            return Err(Error::missing_field("token_name"));
        }
        if self.customer_id.trim().is_empty() {
            return Err(Error::missing_field("customer_id"));
        }
        if self.version.trim().is_empty() {
            return Err(Error::invalid_value("version", "must not be empty"));
        }
        url::Url::parse(&self.api_url)?;
        Ok(())
    }

    /// API root for this account: `<api_url>/<version>/<customer_id>`
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_url.trim_end_matches('/'),
            self.version,
            self.customer_id
        )
    }

    /// Company handle, ignoring blank values
    pub fn company_handle(&self) -> Option<String> {
        self.company_name.clone().none_if_empty()
    }

    /// Configured customer profile IDs, ignoring blank values
    pub fn profile_ids(&self) -> Option<String> {
        self.customer_profile_id.clone().none_if_empty()
    }

    /// Sync start at midnight, formatted as `YYYY-MM-DDTHH:MM:SS`
    pub fn start_timestamp(&self) -> Option<String> {
        self.start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.format(DATETIME_FORMAT).to_string())
    }

    /// JSON schema describing the accepted configuration
    pub fn spec() -> Value {
        json!({
            "type": "object",
            "required": ["token_name", "customer_id"],
            "properties": {
                "token_name": {
                    "type": "string",
                    "secret": true,
                    "description": "The token to authenticate against the API service"
                },
                "version": {
                    "type": "string",
                    "default": DEFAULT_API_VERSION,
                    "description": "API version"
                },
                "customer_id": {
                    "type": "string",
                    "secret": true,
                    "description": "Customer ID"
                },
                "customer_profile_id": {
                    "type": "string",
                    "secret": true,
                    "description": "Comma-separated customer profile IDs you have access to"
                },
                "company_name": {
                    "type": "string",
                    "secret": true,
                    "description": "Company handle exempt from text obfuscation"
                },
                "start_date": {
                    "type": "string",
                    "format": "date",
                    "description": "The earliest record date to sync"
                },
                "api_url": {
                    "type": "string",
                    "default": DEFAULT_API_URL
                },
                "max_retries": {
                    "type": "integer",
                    "default": 3
                },
                "requests_per_second": {
                    "type": "integer",
                    "default": 10
                },
                "user_agent": {
                    "type": "string"
                }
            }
        })
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("token_name", &"***")
            .field("version", &self.version)
            .field("customer_id", &"***")
            .field(
                "customer_profile_id",
                &self.customer_profile_id.as_ref().map(|_| "***"),
            )
            .field("company_name", &self.company_name.as_ref().map(|_| "***"))
            .field("start_date", &self.start_date)
            .field("api_url", &self.api_url)
            .field("max_retries", &self.max_retries)
            .field("requests_per_second", &self.requests_per_second)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Start date parsing
// ============================================================================

fn deserialize_start_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.none_if_empty() {
        None => Ok(None),
        Some(s) => parse_start_date(&s).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parse a start date given as a date or a datetime
pub fn parse_start_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.date());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(nd) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(nd);
        }
    }

    Err(Error::invalid_value(
        "start_date",
        format!("Invalid date format: {s}"),
    ))
}
