//! Handler functions for `config` subcommands.
//!
//! Implements `path`, `get`, `init`, and `show` over [`AppConfig`]. The
//! TOML dotted-key helpers are public so other commands can reuse them.

use std::path::Path;

use scriptsearch_core::{Error, Result};

use crate::cli::{ConfigAction, ConnectionArgs};
use crate::config::AppConfig;

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
///
/// `get` and `show` report the effective configuration: the file with
/// `overrides` applied.
pub fn handle_config_command(
    config_path: Option<&Path>,
    overrides: &ConnectionArgs,
    action: ConfigAction,
) -> Result<()> {
    let effective = || -> Result<AppConfig> {
        let mut config = AppConfig::load(config_path)?;
        overrides.apply(&mut config.connection);
        Ok(config)
    };

    match action {
        ConfigAction::Path => {
            let path = AppConfig::resolve_config_path(config_path).ok_or_else(|| {
                Error::config("Could not determine config directory for this platform")
            })?;
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file does not exist; run `scriptsearch config init` to create it)");
            }
            Ok(())
        }
        ConfigAction::Get { key } => {
            println!("{}", config_value(&effective()?, &key)?);
            Ok(())
        }
        ConfigAction::Init { file, force } => {
            let path = match file.as_deref().or(config_path) {
                Some(p) => p.to_path_buf(),
                None => AppConfig::default_config_path()
                    .ok_or_else(|| Error::config("Could not determine config directory"))?,
            };
            write_default_config(&path, force)?;
            println!("Config file created at {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            print!("{}", effective()?.masked().to_toml_string()?);
            Ok(())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Look up a dotted key in `config`, password masked.
pub fn config_value(config: &AppConfig, key: &str) -> Result<String> {
    let value = toml::Value::try_from(config.masked()).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Write the default configuration to `path`.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = AppConfig::default().to_toml_string()?;
    std::fs::write(path, toml_str).map_err(|e| Error::io_with_path(e, path))?;
    log::debug!("Wrote default config to {}", path.display());
    Ok(())
}

// ============================================================================
// TOML dotted-key helpers (public for reuse)
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    let mut current = value;
    for part in key.split('.') {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
