//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use scriptsearch_client::ClientConfig;

/// Screenplay and movie metadata search over OpenSearch.
#[derive(Parser, Debug)]
#[command(name = "scriptsearch", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SCRIPTSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection overrides; each one replaces the config file value.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Search engine host
    #[arg(long, global = true, env = "SCRIPTSEARCH_HOST")]
    pub host: Option<String>,

    /// Search engine port
    #[arg(long, global = true, env = "SCRIPTSEARCH_PORT")]
    pub port: Option<u16>,

    /// Basic-auth user
    #[arg(long, global = true, env = "SCRIPTSEARCH_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password
    #[arg(long, global = true, env = "SCRIPTSEARCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Connect over HTTPS
    #[arg(long, global = true, env = "SCRIPTSEARCH_SSL")]
    pub ssl: bool,

    /// Index to read and write
    #[arg(long, global = true, env = "SCRIPTSEARCH_INDEX")]
    pub index: Option<String>,
}

impl ConnectionArgs {
    /// Overlay the given flags onto `config`.
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(username) = &self.username {
            config.username.clone_from(username);
        }
        if let Some(password) = &self.password {
            config.password.clone_from(password);
        }
        if self.ssl {
            config.use_ssl = true;
        }
        if let Some(index) = &self.index {
            config.index_name.clone_from(index);
        }
    }
}

/// Locations of the two input corpora.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CorpusArgs {
    /// Directory of screenplay JSON files
    #[arg(long, env = "SCRIPTSEARCH_SCREENPLAYS_DIR")]
    pub screenplays_dir: PathBuf,

    /// Movie metadata JSON file
    #[arg(long, env = "SCRIPTSEARCH_METADATA")]
    pub metadata: PathBuf,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build documents from screenplays and metadata and index them
    Ingest {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Build and report without contacting the search engine
        #[arg(long)]
        dry_run: bool,

        /// Screenplay files processed concurrently
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Search indexed screenplays
    Search {
        /// Query text
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the shape of the metadata corpus and a sample screenplay
    Inspect {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Check that screenplay identifiers have metadata
    CheckMatching {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Screenplay files to sample
        #[arg(long, default_value_t = 10)]
        sample: usize,
    },

    /// Check the search engine is reachable
    Ping,

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the config file path
    Path,

    /// Print one value by dotted key, e.g. `connection.port`
    Get {
        /// Dotted key
        key: String,
    },

    /// Write a default config file
    Init {
        /// Write here instead of the default location
        #[arg(long)]
        file: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration, password masked
    Show,
}

// ============================================================================
// Tests
// ============================================================================
