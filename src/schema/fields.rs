//! Field and metric extraction

use crate::error::{Error, Result};
use serde_json::Value;

/// Key under which metric definitions live
const METRICS_KEY: &str = "metrics";

/// Requestable data fields and metric names of a stream, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMetricSet {
    /// Data fields (every property except `metrics`)
    pub fields: Vec<String>,
    /// Metric names (properties of `metrics`)
    pub metrics: Vec<String>,
}

impl FieldMetricSet {
    /// Create a set from explicit lists
    pub fn new(fields: Vec<String>, metrics: Vec<String>) -> Self {
        Self { fields, metrics }
    }

    /// Check if neither fields nor metrics are present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.metrics.is_empty()
    }

    /// Drop fields that are computed locally and cannot be requested
    #[must_use]
    pub fn without_fields(mut self, computed: &[&str]) -> Self {
        self.fields.retain(|f| !computed.contains(&f.as_str()));
        self
    }

    /// Fields joined for a query parameter
    pub fn fields_csv(&self) -> String {
        self.fields.join(",")
    }

    /// Metrics joined for a query parameter
    pub fn metrics_csv(&self) -> String {
        self.metrics.join(",")
    }
}

/// Get the per-record schema.
///
/// Response-shaped schemas nest the record under `properties.data.items`;
/// plain record schemas are returned as-is.
pub fn record_schema(schema: &Value) -> &Value {
    schema
        .pointer("/properties/data/items")
        .filter(|items| items.get("properties").is_some_and(Value::is_object))
        .unwrap_or(schema)
}

/// Extract the field and metric names from a schema document
pub fn extract_fields(stream: &str, schema: &Value) -> Result<FieldMetricSet> {
    if !schema.is_object() {
        return Err(Error::schema_parse(
            stream,
            "schema document must be a JSON object",
        ));
    }

    let properties = match record_schema(schema).get("properties") {
        None | Some(Value::Null) => return Ok(FieldMetricSet::default()),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(Error::schema_parse(
                stream,
                "'properties' must be a JSON object",
            ))
        }
    };

    let fields = properties
        .keys()
        .filter(|k| k.as_str() != METRICS_KEY)
        .cloned()
        .collect();

    let metrics = properties
        .get(METRICS_KEY)
        .and_then(|m| m.get("properties"))
        .and_then(Value::as_object)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();

    Ok(FieldMetricSet { fields, metrics })
}
