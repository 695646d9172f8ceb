//! # scriptsearch-cli
//!
//! Command-line interface for scriptsearch:
//! - `ingest`: build documents from screenplays and metadata and index them
//! - `search`: query the index and render results
//! - `inspect` and `check-matching`: corpus diagnostics
//! - `ping`: check the search engine is reachable
//! - `config`: manage the TOML config file

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::Cli;
pub use config::AppConfig;
