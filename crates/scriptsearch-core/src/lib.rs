//! Scriptsearch Core — shared types, errors, and record coercion.
//!
//! This crate provides the foundational types used across all scriptsearch
//! crates. It has no internal dependencies (dependency level 0) and performs
//! no I/O.
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`record`]: Metadata and screenplay source records
//! - [`document`]: Searchable documents, query results, skip reasons
//! - [`util`]: Identifier and field coercion

pub mod document;
pub mod error;
pub mod record;
pub mod util;

// Re-export key types at crate root for convenience
pub use document::{BuildOutcome, Document, QueryResult, SkipReason};
pub use error::{Error, Result};
pub use record::{Dialogue, MetadataRecord, Scene, ScreenplayRecord, TextOrList};

// Convenience re-exports from util
pub use util::ids::{coerce_id, source_label};
pub use util::lenient::coerce_rating;
