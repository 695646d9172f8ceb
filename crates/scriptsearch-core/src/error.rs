//! Error types for scriptsearch-core.
//!
//! This is the system-wide error taxonomy. Recoverable per-record conditions
//! (a screenplay without a movie id, a metadata miss, one rejected item in a
//! bulk request) are *not* errors; they are reported as
//! [`SkipReason`](crate::SkipReason) values and itemized bulk results.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for scriptsearch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scriptsearch.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The metadata corpus does not have the expected shape.
    ///
    /// Fatal: ingestion aborts before any screenplay is read.
    #[error("Malformed corpus {source_ref}: {message}")]
    MalformedCorpus {
        /// File path or other reference to the corpus.
        source_ref: String,
        /// What was wrong with it.
        message: String,
    },

    /// The search engine could not be reached within the retry budget.
    #[error("Connection error after {attempts} attempt(s): {message}")]
    Connection {
        /// Number of connection attempts made.
        attempts: u32,
        /// Last failure observed.
        message: String,
    },

    /// A search request was malformed or failed engine-side.
    #[error("Query error: {message}")]
    Query {
        /// Failure detail.
        message: String,
    },

    /// A whole upsert request was rejected or failed in transport.
    #[error("Upsert error: {message}")]
    Upsert {
        /// Failure detail.
        message: String,
    },

    /// Index creation or inspection failed.
    #[error("Index error for '{index}': {message}")]
    Index {
        /// Index name.
        index: String,
        /// Failure detail.
        message: String,
    },

    /// I/O error with the path that caused it.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic.
        message: String,
    },

    /// A required file or directory does not exist.
    #[error("{kind} not found: {what}")]
    NotFound {
        /// The missing item.
        what: String,
        /// What kind of item it is.
        kind: String,
    },
}

impl Error {
    /// Creates a malformed-corpus error.
    pub fn malformed_corpus(source_ref: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedCorpus {
            source_ref: source_ref.into(),
            message: message.into(),
        }
    }

    /// Creates a connection error.
    pub fn connection(attempts: u32, message: impl Into<String>) -> Self {
        Error::Connection {
            attempts,
            message: message.into(),
        }
    }

    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Error::Query {
            message: message.into(),
        }
    }

    /// Creates an upsert error.
    pub fn upsert(message: impl Into<String>) -> Self {
        Error::Upsert {
            message: message.into(),
        }
    }

    /// Creates an index error.
    pub fn index(index: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Index {
            index: index.into(),
            message: message.into(),
        }
    }

    /// Creates an I/O error carrying the offending path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(what: impl Into<String>, kind: impl Into<String>) -> Self {
        Error::NotFound {
            what: what.into(),
            kind: kind.into(),
        }
    }

    /// Returns whether the error must stop the whole run.
    ///
    /// Query and upsert failures concern one request; everything else means
    /// the run cannot meaningfully continue.
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::MalformedCorpus { .. } => true,
            Error::Connection { .. } => true,
            Error::Io { .. } => true,
            Error::Config { .. } => true,
            Error::NotFound { .. } => true,
            Error::Index { .. } => true,
            Error::Json(_) => false,
            Error::Query { .. } => false,
            Error::Upsert { .. } => false,
        }
    }
}
