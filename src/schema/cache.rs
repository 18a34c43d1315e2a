//! Per-run schema cache
//!
//! Schemas are packaged with the binary and parsed once per run.
//! Entries are never invalidated.

use super::fields::{extract_fields, record_schema, FieldMetricSet};
use crate::error::{Error, Result};
use crate::streams::StreamDefinition;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A parsed stream schema with its derived field set
#[derive(Debug, Clone)]
pub struct StreamSchema {
    /// The record schema (unwrapped from the response envelope)
    pub record: Value,
    /// Requestable fields and metrics
    pub fields: FieldMetricSet,
}

/// Cache of parsed schemas keyed by stream name
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<String, Arc<StreamSchema>>,
}

impl SchemaCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the schema for a stream, parsing it on first use.
    ///
    /// Parse failures are not cached.
    pub fn get_or_load(&mut self, def: &StreamDefinition) -> Result<Arc<StreamSchema>> {
        if let Some(entry) = self.entries.get(&def.name) {
            return Ok(Arc::clone(entry));
        }

        let document: Value = serde_json::from_str(def.schema)
            .map_err(|e| Error::schema_parse(&def.name, format!("invalid JSON: {e}")))?;
        let fields = extract_fields(&def.name, &document)?.without_fields(def.computed_fields);
        debug!(
            stream = %def.name,
            fields = fields.fields.len(),
            metrics = fields.metrics.len(),
            "Loaded schema"
        );

        let entry = Arc::new(StreamSchema {
            record: record_schema(&document).clone(),
            fields,
        });
        self.entries.insert(def.name.clone(), Arc::clone(&entry));
        Ok(entry)
    }

    /// Number of cached schemas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
