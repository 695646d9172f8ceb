//! # scriptsearch-client
//!
//! Search engine gateway for scriptsearch.
//!
//! This crate talks to the search engine on behalf of ingestion and query:
//! - Connection with fixed-delay retry and a sticky failed state
//! - Idempotent index creation with the screenplay mappings
//! - Single and chunked bulk upserts with per-item accounting
//! - Weighted multi-field fuzzy queries with highlighting
//!
//! Engine access goes through the [`SearchTransport`] trait; the gateway
//! owns retry, timeouts and error classification.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod query;
pub mod response;
pub mod schema;
pub mod state;
pub mod transport;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use gateway::SearchGateway;
pub use memory::MemoryTransport;
pub use query::{FieldWeights, QueryBuilder};
pub use response::{BatchItemError, BulkReport, Hit, IndexStatus};
pub use schema::IndexSchema;
pub use state::ConnectionState;
pub use transport::{OpenSearchTransport, SearchTransport};
