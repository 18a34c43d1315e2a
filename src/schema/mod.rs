//! Schema module
//!
//! Derives requestable fields and metrics from the packaged JSON schemas.
//!
//! # Overview
//!
//! - `extract_fields` - reads a schema document into a [`FieldMetricSet`]
//! - `record_schema` - unwraps a response schema to the per-record schema
//! - `SchemaCache` - parses each stream's schema once per run

mod cache;
mod fields;

pub use cache::{SchemaCache, StreamSchema};
pub use fields::{extract_fields, record_schema, FieldMetricSet};

#[cfg(test)]
mod tests;
