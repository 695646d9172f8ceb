//! Screenplay ingestion and result formatting for scriptsearch.
//!
//! This crate is the pipeline between files on disk and the search engine
//! gateway in `scriptsearch-client`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     scriptsearch-fts                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MetadataIndex (movies corpus keyed by movie_id)            │
//! │  screenplay discovery and reading                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  build (screenplay + metadata -> Document | Skip)           │
//! │  Ingestor (concurrent build, one chunked bulk write)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  to_results / render (hits -> QueryResult -> text)          │
//! │  match_report, CorpusSummary, ScreenplaySummary             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use scriptsearch_fts::{IngestConfig, Ingestor, MetadataIndex, render, to_results};
//!
//! let index = MetadataIndex::load(&metadata_path).await?;
//! Ingestor::new(IngestConfig::default())
//!     .run(&screenplays, &index, &gateway, &IndexSchema::default())
//!     .await?;
//!
//! let hits = gateway.search("get away from her").await?;
//! println!("{}", render(&to_results(&hits), "get away from her"));
//! ```

pub mod builder;
pub mod corpus;
pub mod document;
pub mod matching;
pub mod results;
pub mod screenplay;
pub mod types;

// Re-exports
pub use builder::{IngestionReport, Ingestor, ProgressFn, SkipDiagnostic};
pub use corpus::{CorpusSummary, MetadataIndex};
pub use document::{build, combined_text, extract_screenplay_text};
pub use matching::{MatchExample, MatchReport, check_matching, match_report};
pub use results::{NO_RESULTS, clean_highlight, render, to_results};
pub use screenplay::{SampleScreenplay, ScreenplaySummary, extension_set, read_screenplay};
pub use types::IngestConfig;
