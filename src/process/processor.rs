//! Record processor

use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::info;

/// Replacement for obfuscated handles
pub const OBFUSCATED: &str = "[Obfuscated]";

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Which post-processing a stream applies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessorKind {
    /// Records are emitted as extracted
    #[default]
    Passthrough,
    /// Handle obfuscation and `start_time` enrichment
    PostAnalytics,
}

/// Outcome of processing one record
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    /// Emit the (possibly transformed) record
    Emit(Record),
    /// Drop the record
    Skip,
}

impl Processed {
    /// The record to emit, if any
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Emit(record) => Some(record),
            Self::Skip => None,
        }
    }
}

/// Applies a stream's post-processing with the run's settings
#[derive(Debug, Clone, Default)]
pub struct RecordProcessor {
    kind: ProcessorKind,
    company_handle: Option<String>,
    start_time: Option<String>,
}

impl RecordProcessor {
    /// Create a processor
    pub fn new(kind: ProcessorKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Create a processor using the company name and start date of `config`
    pub fn from_config(kind: ProcessorKind, config: &TapConfig) -> Self {
        Self {
            kind,
            company_handle: config.company_handle(),
            start_time: config.start_timestamp(),
        }
    }

    /// Set the exempt company handle (without `@`)
    #[must_use]
    pub fn with_company_handle(mut self, handle: impl Into<String>) -> Self {
        self.company_handle = Some(handle.into());
        self
    }

    /// Set the `start_time` stamp
    #[must_use]
    pub fn with_start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    /// Processor kind
    pub fn kind(&self) -> ProcessorKind {
        self.kind
    }

    /// Process one raw record
    pub fn process(&self, record: JsonValue) -> Result<Processed> {
        let JsonValue::Object(mut record) = record else {
            return Err(Error::record(format!(
                "expected a JSON object, got {}",
                type_name(&record)
            )));
        };

        match self.kind {
            ProcessorKind::Passthrough => Ok(Processed::Emit(record)),
            ProcessorKind::PostAnalytics => {
                self.post_analytics(&mut record)?;
                Ok(Processed::Emit(record))
            }
        }
    }

    fn post_analytics(&self, record: &mut Record) -> Result<()> {
        let text = match record.get("text") {
            None | Some(JsonValue::Null) => {
                info!(
                    guid = record.get("guid").map(ToString::to_string).as_deref(),
                    "Record has no 'text' field"
                );
                return Ok(());
            }
            Some(JsonValue::String(text)) => obfuscate_text(text, self.company_handle.as_deref()),
            Some(other) => {
                return Err(Error::record(format!(
                    "'text' must be a string, got {}",
                    type_name(other)
                )))
            }
        };

        record.insert("text".to_string(), JsonValue::String(text));
        if let Some(start_time) = &self.start_time {
            record.insert(
                "start_time".to_string(),
                JsonValue::String(start_time.clone()),
            );
        }
        Ok(())
    }
}

/// Replace every `@handle` token except `@<company>` with `[Obfuscated]`.
///
/// Tokens are whitespace-delimited and matched exactly; whitespace is kept.
pub fn obfuscate_text(text: &str, company: Option<&str>) -> String {
    let exempt = company.map(|c| format!("@{c}"));

    TOKEN_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[0];
            let is_handle = token.len() > 1 && token.starts_with('@');
            if is_handle && exempt.as_deref() != Some(token) {
                OBFUSCATED.to_string()
            } else {
                token.to_string()
            }
        })
        .into_owned()
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
