//! In-process search transport.
//!
//! [`MemoryTransport`] keeps documents in memory and answers searches by
//! linear scan. It is used by tests and by the CLI's dry-run mode.
//!
//! # Limitations
//!
//! - O(n) search time
//! - No stemming or fuzzy matching
//! - Whole-token matching only

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use scriptsearch_core::Document;
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};
use crate::response::{BulkItemResult, BulkResponse, Hit, Hits, SearchResponse};
use crate::transport::SearchTransport;

const MAX_FRAGMENTS: usize = 5;
const FRAGMENT_CONTEXT: usize = 5;

#[derive(Default)]
struct MemoryState {
    indices: BTreeMap<String, BTreeMap<String, Document>>,
    rejections: BTreeMap<String, String>,
}

/// Linear-scan transport holding documents in memory.
#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<MemoryState>,
    offline: AtomicBool,
    pings: AtomicU32,
    bulk_requests: AtomicU32,
}

impl MemoryTransport {
    /// Create an empty, reachable transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that refuses every request.
    pub fn offline() -> Self {
        let transport = Self::default();
        transport.set_reachable(false);
        transport
    }

    /// Toggle reachability.
    pub fn set_reachable(&self, reachable: bool) {
        self.offline.store(!reachable, Ordering::SeqCst);
    }

    /// Reject any future write of `movie_id` with `reason`.
    pub fn reject(&self, movie_id: impl Into<String>, reason: impl Into<String>) {
        self.lock().rejections.insert(movie_id.into(), reason.into());
    }

    /// Liveness probes received so far.
    pub fn ping_count(&self) -> u32 {
        self.pings.load(Ordering::SeqCst)
    }

    /// Bulk requests received so far.
    pub fn bulk_count(&self) -> u32 {
        self.bulk_requests.load(Ordering::SeqCst)
    }

    /// Stored documents in `index`, ordered by id.
    pub fn documents(&self, index: &str) -> Vec<Document> {
        self.lock()
            .indices
            .get(index)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `index` has been created.
    pub fn has_index(&self, index: &str) -> bool {
        self.lock().indices.contains_key(index)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::Unreachable("memory transport is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SearchTransport for MemoryTransport {
    async fn ping(&self) -> Result<bool> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;
        Ok(true)
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        self.ensure_online()?;
        Ok(self.has_index(index))
    }

    async fn create_index(&self, index: &str, _body: &Value) -> Result<()> {
        self.ensure_online()?;
        let mut state = self.lock();
        if state.indices.contains_key(index) {
            return Err(Error::Status {
                status: 400,
                body: format!("resource_already_exists_exception: index [{index}] already exists"),
            });
        }
        state.indices.insert(index.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn put_document(&self, index: &str, document: &Document) -> Result<()> {
        self.ensure_online()?;
        let mut state = self.lock();
        if let Some(reason) = state.rejections.get(&document.movie_id) {
            return Err(Error::Status {
                status: 400,
                body: reason.clone(),
            });
        }
        state
            .indices
            .entry(index.to_string())
            .or_default()
            .insert(document.movie_id.clone(), document.clone());
        Ok(())
    }

    async fn bulk(&self, index: &str, documents: &[Document]) -> Result<BulkResponse> {
        self.bulk_requests.fetch_add(1, Ordering::SeqCst);
        self.ensure_online()?;

        let mut state = self.lock();
        let mut items = Vec::with_capacity(documents.len());
        let mut errors = false;

        for document in documents {
            let rejection = state.rejections.get(&document.movie_id).cloned();
            let result = match rejection {
                Some(reason) => {
                    errors = true;
                    BulkItemResult {
                        id: Some(document.movie_id.clone()),
                        status: 400,
                        error: Some(json!({"type": "mapper_parsing_exception", "reason": reason})),
                    }
                }
                None => {
                    let replaced = state
                        .indices
                        .entry(index.to_string())
                        .or_default()
                        .insert(document.movie_id.clone(), document.clone())
                        .is_some();
                    BulkItemResult {
                        id: Some(document.movie_id.clone()),
                        status: if replaced { 200 } else { 201 },
                        error: None,
                    }
                }
            };
            items.push(BTreeMap::from([("index".to_string(), result)]));
        }

        Ok(BulkResponse { errors, items })
    }

    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse> {
        self.ensure_online()?;
        let request = ScanRequest::from_body(body);
        let state = self.lock();
        let Some(documents) = state.indices.get(index) else {
            return Err(Error::Status {
                status: 404,
                body: format!("index_not_found_exception: no such index [{index}]"),
            });
        };

        let mut hits: Vec<Hit> = documents
            .values()
            .filter_map(|document| request.score(document))
            .collect();
        hits.sort_by(|a, b| {
            b.score
                .unwrap_or_default()
                .total_cmp(&a.score.unwrap_or_default())
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(request.size);

        Ok(SearchResponse {
            took: Some(0),
            hits: Hits {
                total: Some(json!({"value": hits.len(), "relation": "eq"})),
                hits,
            },
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("offline", &self.offline.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Linear scan
// ============================================================================

struct ScanRequest {
    terms: Vec<String>,
    fields: Vec<(String, f64)>,
    highlight: Vec<String>,
    size: usize,
}

impl ScanRequest {
    fn from_body(body: &Value) -> Self {
        let multi_match = &body["query"]["multi_match"];
        let terms = tokens(multi_match["query"].as_str().unwrap_or_default());
        let fields = multi_match["fields"]
            .as_array()
            .map(|fields| fields.iter().filter_map(Value::as_str).map(parse_field).collect())
            .unwrap_or_default();
        let highlight = body["highlight"]["fields"]
            .as_object()
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default();
        let size = body["size"]
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(10);

        Self {
            terms,
            fields,
            highlight,
            size,
        }
    }

    /// Score one document; `None` if no field matches.
    fn score(&self, document: &Document) -> Option<Hit> {
        let Ok(Value::Object(source)) = serde_json::to_value(document) else {
            return None;
        };

        let score: f64 = self
            .fields
            .iter()
            .map(|(field, weight)| {
                let field_tokens = tokens(&field_text(&source, field));
                let matched = self
                    .terms
                    .iter()
                    .filter(|term| field_tokens.contains(term))
                    .count();
                weight * matched as f64
            })
            .sum();
        if score <= 0.0 {
            return None;
        }

        let highlight = self
            .highlight
            .iter()
            .filter_map(|field| {
                let fragments = fragments(&field_text(&source, field), &self.terms);
                (!fragments.is_empty()).then(|| (field.clone(), fragments))
            })
            .collect();

        Some(Hit {
            id: Some(document.movie_id.clone()),
            score: Some(score),
            source,
            highlight,
        })
    }
}

fn parse_field(expr: &str) -> (String, f64) {
    match expr.split_once('^') {
        Some((field, weight)) => (field.to_string(), weight.parse().unwrap_or(1.0)),
        None => (expr.to_string(), 1.0),
    }
}

fn field_text(source: &Map<String, Value>, field: &str) -> String {
    match source.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Split `text` into highlight fragments around matching words.
///
/// Each fragment holds up to `FRAGMENT_CONTEXT` words either side of a
/// match; fragments do not overlap.
fn fragments(text: &str, terms: &[String]) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out = Vec::new();
    let mut next_free = 0;

    for (i, word) in words.iter().enumerate() {
        if i < next_free || emphasize(word, terms).is_none() {
            continue;
        }
        let start = i.saturating_sub(FRAGMENT_CONTEXT).max(next_free);
        let end = (i + FRAGMENT_CONTEXT + 1).min(words.len());
        let fragment: Vec<String> = words[start..end]
            .iter()
            .map(|w| emphasize(w, terms).unwrap_or_else(|| (*w).to_string()))
            .collect();
        out.push(fragment.join(" "));
        next_free = end;
        if out.len() == MAX_FRAGMENTS {
            break;
        }
    }

    out
}

/// Wrap `word` in `<em>` tags if it matches a term; edge punctuation stays
/// outside the tags.
fn emphasize(word: &str, terms: &[String]) -> Option<String> {
    let is_edge = |c: char| !c.is_alphanumeric();
    let core = word.trim_matches(is_edge);
    if core.is_empty() || !terms.contains(&core.to_lowercase()) {
        return None;
    }
    let start = word.len() - word.trim_start_matches(is_edge).len();
    Some(format!(
        "{}<em>{core}</em>{}",
        &word[..start],
        &word[start + core.len()..]
    ))
}
