//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Drives every selected stream page by page
//! - `SyncConfig` - Stream selection and record caps
//! - Message types for output (Schema, Record, Log)
//!
//! Parent and child streams are processed depth-first: each child stream is
//! exhausted for one parent record before the next parent record is handled.

mod types;

pub use types::{LogLevel, Message, MessageSink, SyncConfig, SyncStats};

use crate::config::TapConfig;
use crate::decode::JsonDecoder;
use crate::error::{Error, Result};
use crate::http::{RequestConfig, Transport};
use crate::pagination::PaginationState;
use crate::process::{Processed, RecordProcessor};
use crate::request::{self, DateRange, RequestContext};
use crate::schema::SchemaCache;
use crate::streams::{Catalog, StreamDefinition};
use crate::types::JsonObject;
use chrono::{NaiveDateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine<T: Transport> {
    /// HTTP transport
    transport: T,
    /// Tap configuration
    tap: TapConfig,
    /// Streams available to this run
    catalog: Arc<Catalog>,
    /// Parsed schemas
    schemas: SchemaCache,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
    /// End of the sync window
    run_time: NaiveDateTime,
    /// Streams whose schema message was sent
    announced: HashSet<String>,
    /// Records emitted per stream
    emitted: HashMap<String, usize>,
}

impl<T: Transport> SyncEngine<T> {
    /// Create a new sync engine
    pub fn new(transport: T, tap: TapConfig, catalog: Catalog) -> Self {
        Self {
            transport,
            tap,
            catalog: Arc::new(catalog),
            schemas: SchemaCache::new(),
            config: SyncConfig::default(),
            stats: SyncStats::default(),
            run_time: Utc::now().naive_utc(),
            announced: HashSet::new(),
            emitted: HashMap::new(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin the end of the sync window
    #[must_use]
    pub fn with_run_time(mut self, run_time: NaiveDateTime) -> Self {
        self.run_time = run_time;
        self
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Sync every selected stream.
    ///
    /// Stream failures are logged and counted in the returned stats; only an
    /// invalid stream selection fails the whole run.
    pub async fn sync_all(&mut self, sink: &mut dyn MessageSink) -> Result<SyncStats> {
        let start = Instant::now();
        let catalog = Arc::clone(&self.catalog);
        let selected = catalog.select(&self.config.streams)?;

        for root in catalog.roots() {
            if !catalog.is_needed(&root.name, &selected) {
                debug!(stream = %root.name, "Stream not selected");
                continue;
            }
            self.run_isolated(root, JsonObject::new(), &selected, sink)
                .await;
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            records = self.stats.records_synced,
            pages = self.stats.pages_fetched,
            skipped = self.stats.records_skipped,
            failed = self.stats.streams_failed,
            duration_ms = self.stats.duration_ms,
            "Sync completed"
        );
        Ok(self.stats.clone())
    }

    /// Run one stream, containing its failure
    async fn run_isolated(
        &mut self,
        def: &StreamDefinition,
        parent_context: JsonObject,
        selected: &HashSet<String>,
        sink: &mut dyn MessageSink,
    ) {
        let result = Box::pin(self.sync_stream(def, parent_context, selected, sink)).await;
        match result {
            Ok(()) => self.stats.add_stream(),
            Err(e) => {
                error!(stream = %def.name, error = %e, "Stream failed");
                self.stats.add_failure(&def.name);
                let failure = Error::stream_failed(&def.name, e.to_string());
                if let Err(sink_err) = sink.emit(Message::error(failure.to_string())) {
                    warn!(error = %sink_err, "Failed to emit log message");
                }
            }
        }
    }

    /// Fetch every page of a stream
    async fn sync_stream(
        &mut self,
        def: &StreamDefinition,
        parent_context: JsonObject,
        selected: &HashSet<String>,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        let schema = self.schemas.get_or_load(def)?;
        let emit = selected.contains(&def.name);

        if emit && self.announced.insert(def.name.clone()) {
            sink.emit(Message::schema(
                &def.name,
                schema.record.clone(),
                def.primary_keys.clone(),
                def.replication_key.clone(),
            ))?;
        }

        if emit && self.is_capped(&def.name) {
            debug!(stream = %def.name, "Record cap already reached");
            return Ok(());
        }

        let catalog = Arc::clone(&self.catalog);
        let children: Vec<&StreamDefinition> = catalog
            .children_of(&def.name)
            .filter(|child| catalog.is_needed(&child.name, selected))
            .collect();

        let paginator = def.pagination.build();
        let mut state = PaginationState::start(paginator.as_ref());
        let processor = RecordProcessor::from_config(def.processor, &self.tap);
        let decoder = JsonDecoder::with_path(&def.records_path);
        let base = RequestContext::new()
            .with_customer_profile_id(self.tap.profile_ids())
            .with_date_range(self.date_range())
            .with_parent_context(parent_context);

        info!(stream = %def.name, "Starting stream");

        while !state.done {
            let mut ctx = base.for_page(state.token.clone());
            let prepared = request::build(def, &mut ctx, &schema.fields)?;

            let mut req = RequestConfig::new();
            for (key, value) in prepared.params {
                req = req.query(key, value);
            }
            if let Some(body) = prepared.body {
                req = req.json(body);
            }

            let response = self
                .transport
                .execute(def.method, &def.path, req)
                .await?
                .error_for_status()?;
            self.stats.add_page();

            let records = decoder.decode(&response.json()?)?;
            state.advance(paginator.as_ref(), &response)?;
            debug!(
                stream = %def.name,
                page = state.pages,
                records = records.len(),
                "Fetched page"
            );

            for raw in records {
                let record = match processor.process(raw) {
                    Ok(Processed::Emit(record)) => record,
                    Ok(Processed::Skip) => {
                        self.stats.add_skipped();
                        continue;
                    }
                    Err(e) if e.is_record_level() => {
                        warn!(stream = %def.name, error = %e, "Skipping record");
                        self.stats.add_skipped();
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                let child_runs: Vec<(&StreamDefinition, JsonObject)> = children
                    .iter()
                    .filter_map(|child| {
                        let link = child.parent.as_ref()?;
                        let context = link.context_from(&record);
                        if context.is_none() {
                            warn!(
                                stream = %child.name,
                                key = %link.record_key,
                                "Parent record has no context value"
                            );
                        }
                        context.map(|context| (*child, context))
                    })
                    .collect();

                let mut capped = false;
                if emit {
                    sink.emit(Message::record(&def.name, record))?;
                    self.stats.add_records(1);
                    capped = self.count_emitted(&def.name);
                }

                for (child, context) in child_runs {
                    self.run_isolated(child, context, selected, sink).await;
                }

                if capped {
                    info!(stream = %def.name, max = self.config.max_records, "Record cap reached");
                    state.mark_done();
                    break;
                }
            }
        }

        info!(stream = %def.name, pages = state.pages, "Finished stream");
        Ok(())
    }

    fn date_range(&self) -> Option<DateRange> {
        self.tap
            .start_date
            .map(|start| DateRange::from_start_date(start, self.run_time))
    }

    /// Count one emitted record; true once the per-stream cap is reached
    fn count_emitted(&mut self, stream: &str) -> bool {
        let count = self.emitted.entry(stream.to_string()).or_insert(0);
        *count += 1;
        self.is_capped(stream)
    }

    fn is_capped(&self, stream: &str) -> bool {
        self.config.max_records > 0
            && self.emitted.get(stream).copied().unwrap_or(0) >= self.config.max_records
    }
}

impl<T: Transport> std::fmt::Debug for SyncEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("streams", &self.catalog.names())
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
