//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::{Message, MessageSink, SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig, Transport};
use crate::request::PAGE_LIMIT;
use crate::schema::SchemaCache;
use crate::streams::catalog;
use crate::types::Method;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use tracing::info;

/// Path requested by `check`
const CHECK_PATH: &str = "/metadata/customer";

/// Writes messages to stdout, one per line
#[derive(Debug, Clone, Copy)]
pub struct StdoutSink {
    format: OutputFormat,
}

impl StdoutSink {
    /// Create a sink for the given format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write any serializable message
    pub fn write<T: Serialize>(&self, msg: &T) -> Result<()> {
        let line = match self.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        Ok(())
    }
}

impl MessageSink for StdoutSink {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.write(&message)
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
    out: StdoutSink,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        let out = StdoutSink::new(cli.format);
        Self { cli, out }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check => self.check().await,
            Commands::Discover => self.discover(),
            Commands::Streams => self.streams(),
            Commands::Read { max_records, .. } => {
                self.read(self.cli.command.selected_streams(), *max_records)
                    .await
            }
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json_str(json_str);
        }

        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config(
                "No configuration provided (use --config or --config-json)",
            )),
        }
    }

    /// Show spec
    fn spec(&self) -> Result<()> {
        self.out.write(&json!({
            "type": "SPEC",
            "spec": {
                "documentationUrl": "https://api.sproutsocial.com/docs/",
                "connectionSpecification": TapConfig::spec()
            }
        }))
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = HttpClient::from_tap_config(&config)?;
        info!(base_url = %config.base_url(), "Checking connection");

        let request = RequestConfig::new().query("limit", PAGE_LIMIT.to_string());
        let result = client
            .execute(Method::GET, CHECK_PATH, request)
            .await
            .and_then(|response| response.error_for_status());

        let status = match result {
            Ok(_) => json!({"status": "SUCCEEDED", "message": "Connection successful"}),
            Err(e) => json!({"status": "FAILED", "message": format!("Connection failed: {e}")}),
        };
        self.out.write(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": status
        }))
    }

    /// Discover streams
    fn discover(&self) -> Result<()> {
        let catalog = catalog();
        let mut schemas = SchemaCache::new();

        let mut streams = Vec::new();
        for def in catalog.streams() {
            let schema = schemas.get_or_load(def)?;
            streams.push(json!({
                "stream": def.name,
                "tap_stream_id": def.name,
                "schema": schema.record,
                "key_properties": def.primary_keys,
                "replication_key": def.replication_key,
                "replication_method": "FULL_TABLE",
                "parent_stream": def.parent.as_ref().map(|p| p.stream.as_str()),
            }));
        }

        self.out.write(&json!({
            "type": "CATALOG",
            "catalog": { "streams": streams }
        }))
    }

    /// List stream names
    fn streams(&self) -> Result<()> {
        let catalog = catalog();
        let names: Vec<Value> = catalog.names().into_iter().map(Value::from).collect();
        self.out.write(&json!({
            "type": "STREAMS",
            "streams": names
        }))
    }

    /// Read records
    async fn read(&self, streams: Vec<String>, max_records: Option<usize>) -> Result<()> {
        let config = self.load_config()?;
        let client = HttpClient::from_tap_config(&config)?;
        let sync_config = SyncConfig::new()
            .with_streams(streams)
            .with_max_records(max_records.unwrap_or(0));

        let mut engine = SyncEngine::new(client, config, catalog()).with_config(sync_config);
        let mut sink = self.out;
        let stats = engine.sync_all(&mut sink).await?;

        if stats.has_failures() {
            return Err(Error::Other(format!(
                "{} stream run(s) failed: {}",
                stats.streams_failed,
                stats.failed_streams.join(", ")
            )));
        }
        Ok(())
    }
}
