//! Searchable documents, query results, and build outcomes.
//!
//! A [`Document`] is the flattened, engine-ready form of one movie: metadata
//! joined with text derived from its screenplay. Its JSON field names are the
//! index's field names, so it is serialized straight into upsert requests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::TextOrList;

/// The searchable unit, one per movie.
///
/// Invariants: `movie_id` is never empty, `imdb_rating` is finite and
/// non-negative, and `combined_text` is a deterministic function of the other
/// fields, so re-indexing the same sources yields an equal document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Movie identifier; also the engine document id.
    pub movie_id: String,
    /// Movie title.
    pub title: String,
    /// External rating identifier.
    pub imdb_id: String,
    /// Numeric rating.
    pub imdb_rating: f64,
    /// Release year, as a token.
    pub year: String,
    /// Ordered cast list.
    pub cast: Vec<String>,
    /// Director(s).
    pub directors: TextOrList,
    /// Writer(s).
    pub writers: TextOrList,
    /// Genre(s).
    pub genres: TextOrList,
    /// Plot summary.
    pub plot: String,
    /// Filtered dialogue and scene text.
    pub screenplay_text: String,
    /// All searchable text in a fixed field order.
    pub combined_text: String,
}

/// One matched document from a query, ready for presentation.
///
/// Rebuilt fresh for every query; never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    /// Movie identifier.
    pub movie_id: String,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Director(s), as display text.
    pub directors: String,
    /// Numeric rating.
    pub imdb_rating: f64,
    /// Engine-assigned relevance score.
    pub score: f64,
    /// Highlight fragments keyed by field name, in engine order.
    pub highlights: BTreeMap<String, Vec<String>>,
}

/// Why a screenplay record produced no document.
///
/// Skips are recoverable: they are tallied and reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The screenplay carries no movie identifier.
    MissingMovieId,
    /// No metadata record exists for the screenplay's identifier.
    NoMetadataMatch {
        /// The identifier that found no match.
        movie_id: String,
    },
    /// The source file could not be read or parsed.
    Unreadable {
        /// Read or parse failure detail.
        message: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMovieId => write!(f, "no movie_id"),
            Self::NoMetadataMatch { movie_id } => {
                write!(f, "movie_id {movie_id} not found in metadata")
            }
            Self::Unreadable { message } => write!(f, "unreadable: {message}"),
        }
    }
}

/// Result of joining one screenplay with the metadata index.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// A document was produced.
    Built(Box<Document>),
    /// The record was skipped.
    Skipped(SkipReason),
}

impl BuildOutcome {
    /// Returns `true` if a document was produced.
    pub fn is_built(&self) -> bool {
        matches!(self, Self::Built(_))
    }

    /// The produced document, if any.
    pub fn into_document(self) -> Option<Document> {
        match self {
            Self::Built(doc) => Some(*doc),
            Self::Skipped(_) => None,
        }
    }

    /// The skip reason, if the record was skipped.
    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Built(_) => None,
            Self::Skipped(reason) => Some(reason),
        }
    }
}
