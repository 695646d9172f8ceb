//! Search engine transports.
//!
//! A [`SearchTransport`] is a thin, stateless mapping of engine operations
//! onto requests. Retry, timeout and error classification live one layer
//! up, in [`SearchGateway`](crate::SearchGateway).
//!
//! # Implementations
//!
//! - [`OpenSearchTransport`]: REST over HTTP(S) with basic auth
//! - [`MemoryTransport`](crate::memory::MemoryTransport): linear-scan
//!   in-process engine for tests and dry runs

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use scriptsearch_core::Document;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::response::{BulkResponse, SearchResponse};

/// Operations the gateway needs from a search engine.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Liveness probe. `Ok(false)` means the engine answered but is unhealthy.
    async fn ping(&self) -> Result<bool>;

    /// Whether `index` exists.
    async fn index_exists(&self, index: &str) -> Result<bool>;

    /// Create `index` with the given settings and mappings.
    async fn create_index(&self, index: &str, body: &Value) -> Result<()>;

    /// Create or replace one document, keyed by its movie id.
    async fn put_document(&self, index: &str, document: &Document) -> Result<()>;

    /// Create or replace many documents in one request.
    async fn bulk(&self, index: &str, documents: &[Document]) -> Result<BulkResponse>;

    /// Run a search request.
    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse>;

    /// Transport name for diagnostics.
    fn name(&self) -> &str;
}

// ============================================================================
// OpenSearchTransport
// ============================================================================

/// OpenSearch REST transport.
///
/// Writes pass `refresh=true` so documents are searchable as soon as the
/// call returns.
pub struct OpenSearchTransport {
    client: reqwest::Client,
    base_url: Url,
    username: String,
    password: String,
}

impl OpenSearchTransport {
    /// Create a transport for the engine described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url(), config)
    }

    /// Create a transport for an explicit base URL, taking credentials and
    /// TLS settings from `config`.
    pub fn with_base_url(base_url: &str, config: &ClientConfig) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_certs)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Build an endpoint URL from path segments; segments are escaped.
    fn endpoint(&self, segments: &[&str], query: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Encode documents as a newline-delimited bulk body.
///
/// Each document contributes an action line keyed by its movie id and a
/// source line; the body ends with a newline.
pub fn encode_bulk_body(index: &str, documents: &[Document]) -> Result<String> {
    let mut body = String::new();
    for document in documents {
        let action = serde_json::json!({"index": {"_index": index, "_id": document.movie_id}});
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(document)?);
        body.push('\n');
    }
    Ok(body)
}

#[async_trait]
impl SearchTransport for OpenSearchTransport {
    async fn ping(&self) -> Result<bool> {
        let url = self.endpoint(&[], None)?;
        let response = self.request(reqwest::Method::GET, url).send().await?;
        Ok(response.status().is_success())
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let url = self.endpoint(&[index], None)?;
        let response = self.request(reqwest::Method::HEAD, url).send().await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Self::checked(response).await.map(|_| false),
        }
    }

    async fn create_index(&self, index: &str, body: &Value) -> Result<()> {
        let url = self.endpoint(&[index], None)?;
        let response = self.request(reqwest::Method::PUT, url).json(body).send().await?;
        Self::checked(response).await?;
        Ok(())
    }

    async fn put_document(&self, index: &str, document: &Document) -> Result<()> {
        let url = self.endpoint(
            &[index, "_doc", document.movie_id.as_str()],
            Some("refresh=true"),
        )?;
        let response = self
            .request(reqwest::Method::PUT, url)
            .json(document)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    async fn bulk(&self, index: &str, documents: &[Document]) -> Result<BulkResponse> {
        let url = self.endpoint(&["_bulk"], Some("refresh=true"))?;
        let body = encode_bulk_body(index, documents)?;
        let response = self
            .request(reqwest::Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        let text = Self::checked(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse> {
        let url = self.endpoint(&[index, "_search"], None)?;
        let response = self.request(reqwest::Method::POST, url).json(body).send().await?;
        let text = Self::checked(response).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn name(&self) -> &str {
        "opensearch"
    }
}

impl std::fmt::Debug for OpenSearchTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchTransport")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
