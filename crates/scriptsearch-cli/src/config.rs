//! Application configuration.
//!
//! Configuration is a TOML file with a `[connection]` and an `[ingest]`
//! table, every key optional:
//!
//! ```toml
//! [connection]
//! host = "localhost"
//! port = 9200
//! index_name = "screenplays"
//!
//! [ingest]
//! concurrency = 8
//! ```
//!
//! The file is `--config PATH` when given, else
//! `<config dir>/scriptsearch/config.toml`. A missing default file means
//! defaults; a missing explicit file is an error. Command-line flags and
//! `SCRIPTSEARCH_*` variables are applied on top by
//! [`ConnectionArgs::apply`](crate::cli::ConnectionArgs::apply).

use std::path::{Path, PathBuf};

use scriptsearch_client::ClientConfig;
use scriptsearch_core::{Error, Result};
use scriptsearch_fts::IngestConfig;
use serde::{Deserialize, Serialize};

/// Directory name under the platform config directory.
pub const PROJECT_NAME: &str = "scriptsearch";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Everything the CLI reads from its config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search engine connection.
    pub connection: ClientConfig,
    /// Ingestion settings.
    pub ingest: IngestConfig,
}

impl AppConfig {
    /// `<config dir>/scriptsearch/config.toml`, if the platform has one.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(PROJECT_NAME).join(CONFIG_FILE))
    }

    /// The explicit path if given, else the default path.
    pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path)
    }

    /// Load configuration.
    ///
    /// # Errors
    ///
    /// `Config` if an explicit file is missing or any file fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => {
                    log::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load one config file.
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file not found: {}", path.display()))
            } else {
                Error::io_with_path(e, path)
            }
        })?;
        log::debug!("Loading config from {}", path.display());
        Self::from_toml_str(&text)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Copy safe to print.
    pub fn masked(&self) -> Self {
        Self {
            connection: self.connection.masked(),
            ingest: self.ingest.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [connection]
            host = "search.internal"
            max_retries = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.connection.host, "search.internal");
        assert_eq!(config.connection.max_retries, 2);
        assert_eq!(config.connection.port, 9200);
        assert_eq!(config.ingest, IngestConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[connection\nhost =").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.ingest.concurrency = 3;
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[connection]"));
        assert!(text.contains("[ingest]"));
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[connection]\nindex_name = \"scripts\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.connection.index_name, "scripts");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_resolve_config_path_prefers_explicit() {
        let path = AppConfig::resolve_config_path(Some(Path::new("/etc/ss.toml")));
        assert_eq!(path, Some(PathBuf::from("/etc/ss.toml")));
    }

    #[test]
    fn test_masked_hides_password() {
        let text = AppConfig::default().masked().to_toml_string().unwrap();
        assert!(text.contains("********"));
        assert!(!text.contains("password = \"admin\""));
    }
}
