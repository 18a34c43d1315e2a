//! JSON decoder and path helpers

use crate::error::{Error, Result};
use serde_json::Value;

/// Where Sprout Social responses keep their records
pub const DEFAULT_RECORDS_PATH: &str = "$.data[*]";

/// JSON decoder with record path extraction
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: String,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::with_path(DEFAULT_RECORDS_PATH)
    }
}

impl JsonDecoder {
    /// Create a decoder using the default record path
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }

    /// Get the record path
    pub fn record_path(&self) -> &str {
        &self.record_path
    }

    /// Extract records from a parsed response body.
    ///
    /// Records are returned as raw values; shape checks happen per record
    /// during post-processing.
    pub fn decode(&self, body: &Value) -> Result<Vec<Value>> {
        let path = self.record_path.as_str();
        if path.contains('*') {
            extract_with_jsonpath(body, path)
        } else {
            match extract_path_value(body, path) {
                Some(Value::Array(arr)) => Ok(arr.clone()),
                Some(Value::Null) | None => Ok(vec![]),
                Some(v) => Ok(vec![v.clone()]),
            }
        }
    }
}

/// Extract a value using a JSONPath expression
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

/// Look up a value by dot-notation path (`$.paging.total_pages`)
pub fn extract_path_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// Look up a scalar by dot-notation path and render it as a string
pub fn extract_jsonpath(value: &Value, path: &str) -> Option<String> {
    match extract_path_value(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
