//! The metadata index.
//!
//! The metadata corpus is a JSON object with a `movies` array. Loading
//! validates that shape once and fails loudly with `MalformedCorpus` if it
//! is wrong; an empty index is never produced by accident. Individual
//! entries without a usable `movie_id` are dropped and counted.

use std::collections::HashMap;
use std::path::Path;

use scriptsearch_core::util::ids::movie_id_of;
use scriptsearch_core::util::lenient::text_field;
use scriptsearch_core::{Error, MetadataRecord, Result};
use serde::Serialize;
use serde_json::Value;

/// Keyed view of the metadata corpus.
///
/// Read-only after construction. Duplicate identifiers resolve to the last
/// occurrence in the corpus.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    records: HashMap<String, MetadataRecord>,
    dropped: usize,
}

impl MetadataIndex {
    /// Load and index the corpus at `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the file does not exist, `Io` if it cannot be read,
    /// `MalformedCorpus` if it is not JSON or has no `movies` array.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = read_corpus(path).await?;
        Self::from_json_str(&text, &path.display().to_string())
    }

    /// Index a corpus from JSON text.
    pub fn from_json_str(text: &str, source_ref: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::malformed_corpus(source_ref, format!("invalid JSON: {e}")))?;
        Self::from_value(&value, source_ref)
    }

    /// Index an already-parsed corpus.
    pub fn from_value(value: &Value, source_ref: &str) -> Result<Self> {
        let movies = movies_array(value).map_err(|m| Error::malformed_corpus(source_ref, m))?;

        let mut records = HashMap::with_capacity(movies.len());
        let mut dropped = 0;
        for entry in movies {
            match MetadataRecord::from_value(entry) {
                Some(record) => {
                    records.insert(record.movie_id.clone(), record);
                }
                None => dropped += 1,
            }
        }

        log::info!(
            "Loaded metadata for {} movie(s) from {source_ref} ({dropped} entr{} without movie_id)",
            records.len(),
            if dropped == 1 { "y" } else { "ies" }
        );
        Ok(Self { records, dropped })
    }

    /// Look up a movie by identifier.
    pub fn lookup(&self, movie_id: &str) -> Option<&MetadataRecord> {
        self.records.get(movie_id)
    }

    /// Returns `true` if the identifier is indexed.
    pub fn contains(&self, movie_id: &str) -> bool {
        self.records.contains_key(movie_id)
    }

    /// Number of indexed movies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Corpus entries dropped for lacking a usable identifier.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Up to `n` identifiers in sorted order, for diagnostics.
    pub fn sample_ids(&self, n: usize) -> Vec<&str> {
        let mut ids: Vec<&str> = self.records.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids.truncate(n);
        ids
    }
}

async fn read_corpus(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(path.display().to_string(), "metadata corpus")
        } else {
            Error::io_with_path(e, path)
        }
    })
}

fn movies_array(value: &Value) -> std::result::Result<&Vec<Value>, &'static str> {
    match value {
        Value::Object(fields) => match fields.get("movies") {
            Some(Value::Array(movies)) => Ok(movies),
            Some(_) => Err("'movies' is not an array"),
            None => Err("missing 'movies' array"),
        },
        _ => Err("top level is not an object"),
    }
}

// ============================================================================
// CorpusSummary
// ============================================================================

/// Shape of a metadata corpus, for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    /// Entries in the `movies` array.
    pub movie_count: usize,
    /// Keys of the first entry.
    pub first_record_keys: Vec<String>,
    /// Identifier of the first entry.
    pub first_movie_id: Option<String>,
    /// Title of the first entry.
    pub first_title: Option<String>,
    /// Entries with a usable `movie_id`.
    pub with_movie_id: usize,
}

impl CorpusSummary {
    /// Summarize the corpus at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = read_corpus(path).await?;
        let source_ref = path.display().to_string();
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| Error::malformed_corpus(&source_ref, format!("invalid JSON: {e}")))?;
        Self::from_value(&value, &source_ref)
    }

    /// Summarize an already-parsed corpus.
    pub fn from_value(value: &Value, source_ref: &str) -> Result<Self> {
        let movies = movies_array(value).map_err(|m| Error::malformed_corpus(source_ref, m))?;
        let first = movies.first();

        Ok(Self {
            movie_count: movies.len(),
            first_record_keys: first
                .and_then(Value::as_object)
                .map(|fields| fields.keys().cloned().collect())
                .unwrap_or_default(),
            first_movie_id: first.and_then(movie_id_of),
            first_title: first.and_then(|m| text_field(m, "title")),
            with_movie_id: movies.iter().filter(|m| movie_id_of(m).is_some()).count(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
