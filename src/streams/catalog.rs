//! Built-in stream catalog

use super::definition::{ParentLink, StreamDefinition};
use crate::error::{Error, Result};
use crate::pagination::PaginationConfig;
use crate::process::ProcessorKind;
use crate::request::RequestShape;
use std::collections::HashSet;

const CUSTOMER_PROFILES_SCHEMA: &str = include_str!("../../schemas/customer_profiles.json");
const CUSTOMER_TAGS_SCHEMA: &str = include_str!("../../schemas/customer_tags.json");
const POST_ANALYTICS_SCHEMA: &str = include_str!("../../schemas/post_analytics.json");

/// Ordered set of stream definitions
#[derive(Debug, Clone)]
pub struct Catalog {
    streams: Vec<StreamDefinition>,
}

impl Catalog {
    /// Create a catalog, checking names are unique and parents exist
    pub fn new(streams: Vec<StreamDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for stream in &streams {
            if !seen.insert(stream.name.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate stream name '{}'",
                    stream.name
                )));
            }
        }

        for stream in &streams {
            if let Some(parent) = &stream.parent {
                if parent.stream == stream.name || !seen.contains(parent.stream.as_str()) {
                    return Err(Error::config(format!(
                        "Stream '{}' has unknown parent '{}'",
                        stream.name, parent.stream
                    )));
                }
            }
        }

        Ok(Self { streams })
    }

    /// All streams in declaration order
    pub fn streams(&self) -> &[StreamDefinition] {
        &self.streams
    }

    /// Stream names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&StreamDefinition> {
        self.streams.iter().find(|s| s.name == name)
    }

    /// Streams without a parent
    pub fn roots(&self) -> impl Iterator<Item = &StreamDefinition> {
        self.streams.iter().filter(|s| s.parent.is_none())
    }

    /// Direct children of a stream
    pub fn children_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a StreamDefinition> {
        self.streams
            .iter()
            .filter(move |s| s.parent.as_ref().is_some_and(|p| p.stream == name))
    }

    /// Resolve a selection of stream names.
    ///
    /// An empty selection means every stream. Unknown names are an error.
    pub fn select(&self, names: &[String]) -> Result<HashSet<String>> {
        if names.is_empty() {
            return Ok(self.streams.iter().map(|s| s.name.clone()).collect());
        }

        names
            .iter()
            .map(|name| {
                self.get(name)
                    .map(|s| s.name.clone())
                    .ok_or_else(|| Error::StreamNotFound {
                        stream: name.clone(),
                    })
            })
            .collect()
    }

    /// Check if a stream or any of its descendants is selected
    pub fn is_needed(&self, name: &str, selected: &HashSet<String>) -> bool {
        selected.contains(name) || self.children_of(name).any(|c| self.is_needed(&c.name, selected))
    }
}

/// The Sprout Social streams
pub fn catalog() -> Catalog {
    let streams = vec![
        StreamDefinition::get("customer_profiles", "/metadata/customer")
            .with_primary_keys(&["customer_profile_id"])
            .with_schema(CUSTOMER_PROFILES_SCHEMA),
        StreamDefinition::get("customer_tags", "/metadata/customer/tags")
            .with_primary_keys(&["tag_id"])
            .with_schema(CUSTOMER_TAGS_SCHEMA),
        StreamDefinition::post("post_analytics", "/analytics/posts")
            .with_primary_keys(&["guid"])
            .with_parent(ParentLink::customer_profiles())
            .with_pagination(PaginationConfig::guid_cursor())
            .with_request_shape(RequestShape::AnalyticsBody)
            .with_processor(ProcessorKind::PostAnalytics)
            .with_schema(POST_ANALYTICS_SCHEMA)
            .with_computed_fields(&["start_time"]),
    ];

    Catalog { streams }
}
