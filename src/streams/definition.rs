//! Stream definition types

use crate::decode::DEFAULT_RECORDS_PATH;
use crate::pagination::PaginationConfig;
use crate::process::ProcessorKind;
use crate::request::{RequestShape, PROFILE_LIST_KEY};
use crate::types::{JsonObject, JsonValue, Method};

/// Link from a child stream to the parent stream feeding its context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Parent stream name
    pub stream: String,
    /// Field read from each parent record
    pub record_key: String,
    /// Context key the value is stored under
    pub context_key: String,
}

impl ParentLink {
    /// Create a parent link
    pub fn new(
        stream: impl Into<String>,
        record_key: impl Into<String>,
        context_key: impl Into<String>,
    ) -> Self {
        Self {
            stream: stream.into(),
            record_key: record_key.into(),
            context_key: context_key.into(),
        }
    }

    /// Child of `customer_profiles`, keyed by profile id
    pub fn customer_profiles() -> Self {
        Self::new("customer_profiles", "customer_profile_id", PROFILE_LIST_KEY)
    }

    /// Context for the child stream derived from one parent record.
    ///
    /// Returns `None` when the record has no usable value.
    pub fn context_from(&self, record: &JsonObject) -> Option<JsonObject> {
        let value = record
            .get(&self.record_key)
            .filter(|v| !v.is_null())?
            .clone();
        let mut context = JsonObject::new();
        context.insert(self.context_key.clone(), value);
        Some(context)
    }
}

/// A logical stream of records
#[derive(Debug, Clone)]
pub struct StreamDefinition {
    /// Stream name
    pub name: String,
    /// Endpoint path relative to the base URL
    pub path: String,
    /// HTTP method
    pub method: Method,
    /// Fields forming the record identity
    pub primary_keys: Vec<String>,
    /// Replication key, if any
    pub replication_key: Option<String>,
    /// Parent stream link
    pub parent: Option<ParentLink>,
    /// Pagination strategy
    pub pagination: PaginationConfig,
    /// Request shape
    pub request: RequestShape,
    /// Record post-processing
    pub processor: ProcessorKind,
    /// JSONPath to the records of a response
    pub records_path: String,
    /// Packaged JSON schema
    pub schema: &'static str,
    /// Schema fields computed locally and never requested
    pub computed_fields: &'static [&'static str],
}

impl StreamDefinition {
    /// Create a stream with the given method and defaults for everything else
    pub fn new(name: impl Into<String>, path: impl Into<String>, method: Method) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method,
            primary_keys: Vec::new(),
            replication_key: None,
            parent: None,
            pagination: PaginationConfig::None,
            request: RequestShape::Plain,
            processor: ProcessorKind::Passthrough,
            records_path: DEFAULT_RECORDS_PATH.to_string(),
            schema: "{}",
            computed_fields: &[],
        }
    }

    /// Create a GET stream
    pub fn get(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, path, Method::GET)
    }

    /// Create a POST stream
    pub fn post(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(name, path, Method::POST)
    }

    /// Set primary keys
    #[must_use]
    pub fn with_primary_keys(mut self, keys: &[&str]) -> Self {
        self.primary_keys = keys.iter().map(ToString::to_string).collect();
        self
    }

    /// Set replication key
    #[must_use]
    pub fn with_replication_key(mut self, key: impl Into<String>) -> Self {
        self.replication_key = Some(key.into());
        self
    }

    /// Set parent link
    #[must_use]
    pub fn with_parent(mut self, parent: ParentLink) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set pagination strategy
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Set request shape
    #[must_use]
    pub fn with_request_shape(mut self, shape: RequestShape) -> Self {
        self.request = shape;
        self
    }

    /// Set record processor
    #[must_use]
    pub fn with_processor(mut self, processor: ProcessorKind) -> Self {
        self.processor = processor;
        self
    }

    /// Set records path
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = path.into();
        self
    }

    /// Set packaged schema
    #[must_use]
    pub fn with_schema(mut self, schema: &'static str) -> Self {
        self.schema = schema;
        self
    }

    /// Set locally computed fields
    #[must_use]
    pub fn with_computed_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.computed_fields = fields;
        self
    }

    /// Check if this stream is fed by a parent
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Primary keys as a JSON array
    pub fn key_properties(&self) -> JsonValue {
        JsonValue::from(self.primary_keys.clone())
    }
}
