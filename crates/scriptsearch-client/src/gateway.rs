//! The search engine gateway.
//!
//! [`SearchGateway`] owns a transport and a connection state, and is the
//! only place engine failures are classified into the error taxonomy:
//!
//! | Failure                           | Error                 |
//! |-----------------------------------|-----------------------|
//! | retry budget exhausted            | `Error::Connection`   |
//! | index check or creation failed    | `Error::Index`        |
//! | single-document write failed      | `Error::Upsert`       |
//! | search failed or timed out        | `Error::Query`        |
//!
//! Bulk writes never fail as a whole: every document is accounted for in
//! the returned [`BulkReport`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use scriptsearch_core::{Document, Error, Result};
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::query::{FieldWeights, QueryBuilder};
use crate::response::{BulkReport, Hit, IndexStatus};
use crate::schema::IndexSchema;
use crate::state::ConnectionState;
use crate::transport::{OpenSearchTransport, SearchTransport};

/// Bulk item failures logged individually before summarizing.
const LOGGED_FAILURES: usize = 5;

/// Gateway to one index on a search engine.
///
/// Connection is lazy: the first operation connects with retry. Concurrent
/// callers share one connect attempt; none of them starts a second retry
/// loop. Once the retry budget is exhausted the gateway stays `Failed` and
/// later operations fail fast until [`connect`](Self::connect) is called
/// again.
pub struct SearchGateway {
    transport: Arc<dyn SearchTransport>,
    config: ClientConfig,
    state: Mutex<ConnectionState>,
}

impl SearchGateway {
    /// Create a gateway over an existing transport.
    pub fn new(transport: Arc<dyn SearchTransport>, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            state: Mutex::new(ConnectionState::Disconnected),
        }
    }

    /// Create a gateway over HTTP to the engine described by `config`.
    pub fn opensearch(config: ClientConfig) -> Result<Self> {
        let transport = OpenSearchTransport::new(&config).map_err(|e| Error::config(e.to_string()))?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// The gateway's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Name of the underlying transport.
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        self.state.lock().await.clone()
    }

    /// Connect, retrying with a fixed delay.
    ///
    /// Makes at most `max_retries` probe attempts, sleeping `retry_delay`
    /// between them. Returns immediately if already connected. A `Failed`
    /// gateway is retried.
    pub async fn connect(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.is_connected() {
            return Ok(());
        }
        self.connect_locked(&mut state).await
    }

    async fn ensure_connected(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        match &*state {
            ConnectionState::Connected => Ok(()),
            ConnectionState::Failed { attempts, reason } => Err(Error::connection(
                *attempts,
                format!("search engine unavailable: {reason}"),
            )),
            ConnectionState::Disconnected => self.connect_locked(&mut state).await,
        }
    }

    async fn connect_locked(&self, state: &mut ConnectionState) -> Result<()> {
        let max_attempts = self.config.max_retries.max(1);
        let attempts = AtomicU32::new(0);
        let base_url = self.config.base_url();

        let transport = &self.transport;
        let counter = &attempts;
        let timeout = self.config.request_timeout();
        let target = base_url.as_str();

        let probe = move || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            log::debug!("Probing {target} (attempt {attempt}/{max_attempts})");
            match tokio::time::timeout(timeout, transport.ping()).await {
                Ok(Ok(true)) => Ok(()),
                Ok(Ok(false)) => Err("liveness probe returned an error status".to_string()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("liveness probe timed out after {timeout:?}")),
            }
        };

        let retry_policy = ConstantBuilder::default()
            .with_delay(self.config.retry_delay())
            .with_max_times(max_attempts as usize - 1);

        let outcome = probe
            .retry(retry_policy)
            .sleep(tokio::time::sleep)
            .notify(|reason: &String, delay: Duration| {
                log::warn!("Connection to {target} failed: {reason}; retrying in {delay:?}");
            })
            .await;

        let made = attempts.load(Ordering::SeqCst);
        match outcome {
            Ok(()) => {
                log::info!(
                    "Connected to {} at {base_url} (attempt {made})",
                    self.transport.name()
                );
                *state = ConnectionState::Connected;
                Ok(())
            }
            Err(reason) => {
                log::error!("Giving up on {base_url} after {made} attempt(s): {reason}");
                *state = ConnectionState::Failed {
                    attempts: made,
                    reason: reason.clone(),
                };
                Err(Error::connection(made, reason))
            }
        }
    }

    /// Run one request under the request timeout, flattening failures to
    /// a message.
    async fn timed<T, F>(&self, request: F) -> std::result::Result<T, String>
    where
        F: Future<Output = crate::Result<T>>,
    {
        let timeout = self.config.request_timeout();
        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_timeout() => Err(format!("request timed out after {timeout:?}")),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("request timed out after {timeout:?}")),
        }
    }

    /// Create the index if it does not exist.
    ///
    /// Idempotent: an existing index is left untouched, whatever its
    /// mappings.
    pub async fn ensure_index(&self, schema: &IndexSchema) -> Result<IndexStatus> {
        self.ensure_connected().await?;
        let index = self.config.index_name.as_str();

        let exists = self
            .timed(self.transport.index_exists(index))
            .await
            .map_err(|message| Error::index(index, message))?;
        if exists {
            log::info!("Index '{index}' already exists");
            return Ok(IndexStatus::AlreadyExists);
        }

        self.timed(self.transport.create_index(index, &schema.to_body()))
            .await
            .map_err(|message| Error::index(index, message))?;
        log::info!("Created index '{index}'");
        Ok(IndexStatus::Created)
    }

    /// Create or replace one document.
    pub async fn upsert_one(&self, document: &Document) -> Result<()> {
        self.ensure_connected().await?;
        let index = self.config.index_name.as_str();
        self.timed(self.transport.put_document(index, document))
            .await
            .map_err(|message| Error::upsert(format!("{}: {message}", document.movie_id)))?;
        log::debug!("Indexed document {}", document.movie_id);
        Ok(())
    }

    /// Create or replace many documents, `bulk_chunk_size` per request.
    ///
    /// Per-item rejections are reported, not raised. A chunk whose request
    /// fails outright has each of its documents reported as failed, and
    /// later chunks are still sent. Only a connection failure is an error.
    pub async fn upsert_batch(&self, documents: &[Document]) -> Result<BulkReport> {
        if documents.is_empty() {
            return Ok(BulkReport::default());
        }
        self.ensure_connected().await?;

        let index = self.config.index_name.as_str();
        let chunk_size = self.config.bulk_chunk_size.max(1);
        let mut report = BulkReport::default();

        for (n, chunk) in documents.chunks(chunk_size).enumerate() {
            let ids: Vec<String> = chunk.iter().map(|d| d.movie_id.clone()).collect();
            match self.timed(self.transport.bulk(index, chunk)).await {
                Ok(response) => report.merge(response.itemize(&ids)),
                Err(message) => {
                    log::error!("Bulk request {} ({} documents) failed: {message}", n + 1, ids.len());
                    report.merge(BulkReport::all_failed(&ids, &message));
                }
            }
        }

        if report.is_complete() {
            log::info!("Indexed {} document(s)", report.indexed.len());
        } else {
            for failure in report.failed.iter().take(LOGGED_FAILURES) {
                log::warn!(
                    "Document {} rejected (status {}): {}",
                    failure.movie_id,
                    failure.status,
                    failure.reason
                );
            }
            log::warn!(
                "Indexed {} document(s), {} failed",
                report.indexed.len(),
                report.failed.len()
            );
        }

        Ok(report)
    }

    /// Search with the given field weights.
    ///
    /// Returns at most `result_limit` hits in engine rank order.
    pub async fn query(&self, text: &str, weights: &FieldWeights) -> Result<Vec<Hit>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::query("query text is empty"));
        }
        self.ensure_connected().await?;

        let body = QueryBuilder::new(weights.clone())
            .with_size(self.config.result_limit)
            .build(text);
        let index = self.config.index_name.as_str();

        let response = self
            .timed(self.transport.search(index, &body))
            .await
            .map_err(Error::query)?;
        let hits = response.into_hits();
        log::debug!("Query '{text}' matched {} hit(s)", hits.len());
        Ok(hits)
    }

    /// Search with the default field weights.
    pub async fn search(&self, text: &str) -> Result<Vec<Hit>> {
        self.query(text, &FieldWeights::default()).await
    }
}

impl std::fmt::Debug for SearchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchGateway")
            .field("transport", &self.transport.name())
            .field("index", &self.config.index_name)
            .finish_non_exhaustive()
    }
}
