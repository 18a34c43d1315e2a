//! Response decoder module
//!
//! Extracts records and single values from JSON response bodies.
//!
//! # Overview
//!
//! Records are located with a JSONPath expression (`$.data[*]` for every
//! Sprout Social endpoint). Pagination metadata is read with simple
//! dot-notation paths.

mod json;

pub use json::{extract_jsonpath, extract_path_value, JsonDecoder, DEFAULT_RECORDS_PATH};
