//! Engine types
//!
//! Message types, sinks and configuration for the sync engine.

use crate::error::Result;
use crate::types::{JsonValue, Record};
use serde::Serialize;

/// A message emitted during sync
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Message {
    /// Stream schema, sent before the stream's first record
    Schema {
        /// Stream name
        stream: String,
        /// Record schema
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key
        #[serde(skip_serializing_if = "Option::is_none")]
        replication_key: Option<String>,
    },
    /// A single record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: Record,
    },
    /// Log message
    Log {
        /// Log level
        level: LogLevel,
        /// Log message
        message: String,
    },
}

/// Log level for engine messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// General information
    Info,
    /// Warning
    Warn,
    /// Error (non-fatal)
    Error,
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: JsonValue,
        key_properties: Vec<String>,
        replication_key: Option<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
            replication_key,
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: Record) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
        }
    }

    /// Create a log message
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// Create an error log
    pub fn error(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Error, message)
    }

    /// Stream this message belongs to
    pub fn stream(&self) -> Option<&str> {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => Some(stream),
            Self::Log { .. } => None,
        }
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a log message
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log { .. })
    }
}

/// Destination for sync messages
pub trait MessageSink {
    /// Accept one message
    fn emit(&mut self, message: Message) -> Result<()>;
}

impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Streams to emit (empty = all)
    pub streams: Vec<String>,
    /// Maximum records to emit per stream (0 = unlimited)
    pub max_records: usize,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select streams to emit
    #[must_use]
    pub fn with_streams(mut self, streams: Vec<String>) -> Self {
        self.streams = streams;
        self
    }

    /// Set max records
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Records emitted
    pub records_synced: usize,
    /// Records skipped by post-processing
    pub records_skipped: usize,
    /// Pages fetched
    pub pages_fetched: usize,
    /// Stream runs completed (one per parent record for child streams)
    pub streams_synced: usize,
    /// Stream runs aborted by an error
    pub streams_failed: usize,
    /// Names of streams with at least one failed run
    pub failed_streams: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a skipped record
    pub fn add_skipped(&mut self) {
        self.records_skipped += 1;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a completed stream run
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Add a failed stream run
    pub fn add_failure(&mut self, stream: &str) {
        self.streams_failed += 1;
        if !self.failed_streams.iter().any(|s| s == stream) {
            self.failed_streams.push(stream.to_string());
        }
    }

    /// Check if any stream run failed
    pub fn has_failures(&self) -> bool {
        self.streams_failed > 0
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
