//! Screenplay file discovery and reading.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_walkdir::WalkDir;
use futures::StreamExt;
use scriptsearch_core::util::ids::movie_id_of;
use scriptsearch_core::{Error, Result, ScreenplayRecord, source_label};
use serde::Serialize;
use serde::de::Error as _;
use serde_json::Value;

/// Fail with `NotFound` unless `dir` is an existing directory.
pub async fn ensure_directory(dir: &Path) -> Result<()> {
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::not_found(dir.display().to_string(), "screenplay directory")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::not_found(dir.display().to_string(), "screenplay directory"))
        }
        Err(e) => Err(Error::io_with_path(e, dir)),
    }
}

/// Find all files with the given extensions in a directory tree.
///
/// Recursively walks the directory and returns paths to files matching
/// any of the specified extensions (case-insensitive).
///
/// # Arguments
///
/// * `root` - Root directory to search
/// * `extensions` - Set of extensions to match (lowercase, without dots)
///
/// # Returns
///
/// Sorted list of file paths matching the extensions.
pub async fn find_files_with_extensions(
    root: &Path,
    extensions: &HashSet<String>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut walker = WalkDir::new(root);

    while let Some(entry) = walker.next().await {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Walk error: {}", e);
                continue;
            }
        };

        let path = entry.path();

        // Skip directories
        if path.is_dir() {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if extensions.contains(&ext_lower) {
                files.push(path);
            }
        }
    }

    // Sort for deterministic ordering
    files.sort();

    Ok(files)
}

/// Normalize configured extensions into a lookup set.
pub fn extension_set(extensions: &[String]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect()
}

async fn read_json(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;
    Ok(serde_json::from_str(&text)?)
}

/// Read and parse one screenplay file.
///
/// # Errors
///
/// `Io` if the file cannot be read, and `Json` if it is not JSON or its top
/// level is not an object. Both concern this file only.
pub async fn read_screenplay(path: &Path) -> Result<ScreenplayRecord> {
    let value = read_json(path).await?;
    ScreenplayRecord::from_value(&value).ok_or_else(|| {
        Error::Json(serde_json::Error::custom(format!(
            "{}: expected a JSON object at the top level",
            source_label(path)
        )))
    })
}

// ============================================================================
// ScreenplaySummary
// ============================================================================

/// Shape of one screenplay file, for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleScreenplay {
    /// File name.
    pub file_name: String,
    /// Top-level keys.
    pub keys: Vec<String>,
    /// Identifier, if present.
    pub movie_id: Option<String>,
    /// Length of `dialogues`, if present.
    pub dialogue_count: Option<usize>,
    /// Keys of the first dialogue entry.
    pub first_dialogue_keys: Vec<String>,
    /// Length of `scenes`, if present.
    pub scene_count: Option<usize>,
}

impl SampleScreenplay {
    /// Describe a parsed screenplay.
    pub fn from_value(file_name: impl Into<String>, value: &Value) -> Self {
        let keys = |v: Option<&Value>| -> Vec<String> {
            v.and_then(Value::as_object)
                .map(|fields| fields.keys().cloned().collect())
                .unwrap_or_default()
        };
        let dialogues = value.get("dialogues").and_then(Value::as_array);

        Self {
            file_name: file_name.into(),
            keys: keys(Some(value)),
            movie_id: movie_id_of(value),
            dialogue_count: dialogues.map(Vec::len),
            first_dialogue_keys: keys(dialogues.and_then(|d| d.first())),
            scene_count: value.get("scenes").and_then(Value::as_array).map(Vec::len),
        }
    }
}

/// Shape of a screenplay directory, for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenplaySummary {
    /// Matching files found.
    pub file_count: usize,
    /// The first file's shape, if it could be read.
    pub sample: Option<SampleScreenplay>,
    /// Why the first file could not be read.
    pub sample_error: Option<String>,
}

impl ScreenplaySummary {
    /// Summarize the screenplay files under `dir`.
    pub async fn inspect(dir: &Path, extensions: &HashSet<String>) -> Result<Self> {
        ensure_directory(dir).await?;
        let files = find_files_with_extensions(dir, extensions).await?;

        let (sample, sample_error) = match files.first() {
            None => (None, None),
            Some(path) => match read_json(path).await {
                Ok(value) => (Some(SampleScreenplay::from_value(source_label(path), &value)), None),
                Err(e) => (None, Some(e.to_string())),
            },
        };

        Ok(Self {
            file_count: files.len(),
            sample,
            sample_error,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
