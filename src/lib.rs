// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Sprout Social tap
//!
//! Extracts customer metadata and post analytics from the Sprout Social
//! REST API and emits them as JSON messages for downstream ingestion.
//!
//! ## Features
//!
//! - **Schema-driven requests**: fields and metrics are derived from the packaged stream schemas
//! - **Pagination**: guid cursor, body page number, next-page token
//! - **Parent/child streams**: post analytics are fetched per customer profile
//! - **Privacy**: `@handle` mentions in post text are obfuscated
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sproutsocial_tap::config::TapConfig;
//! use sproutsocial_tap::engine::{Message, SyncConfig, SyncEngine};
//! use sproutsocial_tap::http::HttpClient;
//! use sproutsocial_tap::streams::catalog;
//!
//! #[tokio::main]
//! async fn main() -> sproutsocial_tap::Result<()> {
//!     let config = TapConfig::from_file("config.json".as_ref())?;
//!     let client = HttpClient::from_tap_config(&config)?;
//!
//!     let mut engine = SyncEngine::new(client, config, catalog())
//!         .with_config(SyncConfig::new().with_streams(vec!["post_analytics".into()]));
//!
//!     let mut messages: Vec<Message> = Vec::new();
//!     let stats = engine.sync_all(&mut messages).await?;
//!     println!("{} records", stats.records_synced);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         SyncEngine                              │
//! │   catalog → schema cache → page loop → post-process → sink      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │  Request  │   Process   │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Bearer   │ GET/POST  │ Guid cursor   │ Fields    │ Obfuscate   │
//! │          │ Retry     │ Body page     │ Filters   │ start_time  │
//! │          │ Rate Limit│ Next page     │ Sort      │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Bearer token authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Record and value extraction from responses
pub mod decode;

/// Field and metric extraction from stream schemas
pub mod schema;

/// Pagination strategies
pub mod pagination;

/// Request parameter and body construction
pub mod request;

/// Record post-processing
pub mod process;

/// Stream definitions and catalog
pub mod streams;

/// Main execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::TapConfig;
pub use engine::{Message, SyncConfig, SyncEngine};
pub use streams::{catalog, Catalog, StreamDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
