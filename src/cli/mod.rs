//! CLI module
//!
//! Command-line interface for the tap.
//!
//! # Commands
//!
//! - `spec` - Show the configuration schema
//! - `check` - Test connection to the API
//! - `discover` - List streams with their schemas
//! - `streams` - List stream names (lightweight)
//! - `read` - Extract records from streams

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{Runner, StdoutSink};
