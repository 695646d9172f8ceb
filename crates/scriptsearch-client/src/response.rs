//! Engine response shapes and per-item bulk accounting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Search
// ============================================================================

/// Decoded search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Engine-side time taken, in milliseconds.
    #[serde(default)]
    pub took: Option<u64>,
    /// Hit envelope.
    #[serde(default)]
    pub hits: Hits,
}

/// The `hits` envelope of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    /// Total match count; shape varies across engine versions.
    #[serde(default)]
    pub total: Option<Value>,
    /// Hits in rank order.
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// One matched document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Document id.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Relevance score.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    /// Stored document fields.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
    /// Highlight fragments keyed by field.
    #[serde(default)]
    pub highlight: BTreeMap<String, Vec<String>>,
}

impl SearchResponse {
    /// Consume the response, yielding hits in rank order.
    pub fn into_hits(self) -> Vec<Hit> {
        self.hits.hits
    }
}

// ============================================================================
// Bulk
// ============================================================================

/// Decoded bulk response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    /// `true` if any item failed.
    #[serde(default)]
    pub errors: bool,
    /// One entry per request item, keyed by action name (`index`).
    #[serde(default)]
    pub items: Vec<BTreeMap<String, BulkItemResult>>,
}

/// Outcome of one bulk item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkItemResult {
    /// Document id.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// HTTP status for this item.
    #[serde(default)]
    pub status: u16,
    /// Error object, present on failure.
    #[serde(default)]
    pub error: Option<Value>,
}

impl BulkItemResult {
    fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }

    fn reason(&self) -> String {
        match &self.error {
            Some(Value::Object(error)) => {
                let kind = error.get("type").and_then(Value::as_str);
                let reason = error.get("reason").and_then(Value::as_str);
                match (kind, reason) {
                    (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
                    (Some(text), None) | (None, Some(text)) => text.to_string(),
                    (None, None) => Value::Object(error.clone()).to_string(),
                }
            }
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => format!("status {}", self.status),
        }
    }
}

impl BulkResponse {
    /// Account for every requested document.
    ///
    /// `requested` lists the document ids in request order. An item without
    /// an `_id` is matched by position; a document with no item at all is
    /// reported as failed.
    pub fn itemize(&self, requested: &[String]) -> BulkReport {
        let mut report = BulkReport::default();

        for (position, requested_id) in requested.iter().enumerate() {
            let item = self.items.get(position).and_then(|entry| entry.values().next());
            match item {
                Some(item) => {
                    let id = item.id.clone().unwrap_or_else(|| requested_id.clone());
                    if item.is_success() {
                        report.indexed.push(id);
                    } else {
                        report.failed.push(BatchItemError {
                            movie_id: id,
                            status: item.status,
                            reason: item.reason(),
                        });
                    }
                }
                None => report.failed.push(BatchItemError {
                    movie_id: requested_id.clone(),
                    status: 0,
                    reason: "no result returned for item".to_string(),
                }),
            }
        }

        report
    }
}

/// One document the engine did not accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItemError {
    /// Rejected document id.
    pub movie_id: String,
    /// Item status; `0` when the whole request failed in transport.
    pub status: u16,
    /// Failure detail.
    pub reason: String,
}

/// Per-item accounting of a batch upsert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    /// Ids of documents written.
    pub indexed: Vec<String>,
    /// Documents rejected, with reasons.
    pub failed: Vec<BatchItemError>,
}

impl BulkReport {
    /// Number of documents accounted for.
    pub fn total(&self) -> usize {
        self.indexed.len() + self.failed.len()
    }

    /// Returns `true` if nothing was rejected.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Fold another chunk's report into this one.
    pub fn merge(&mut self, other: BulkReport) {
        self.indexed.extend(other.indexed);
        self.failed.extend(other.failed);
    }

    /// Report every id as failed with the same reason.
    pub fn all_failed(ids: &[String], reason: &str) -> Self {
        Self {
            indexed: Vec::new(),
            failed: ids
                .iter()
                .map(|id| BatchItemError {
                    movie_id: id.clone(),
                    status: 0,
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }
}

/// Outcome of an idempotent index creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    /// The index was created by this call.
    Created,
    /// The index was already present; nothing changed.
    AlreadyExists,
}
