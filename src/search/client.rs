use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::Config;

/// Upper bound on a live search response body.
const MAX_RESPONSE_SIZE: usize = 1024 * 1024; // 1MB

// ============================================================================
// Types
// ============================================================================

/// One live search hit, as returned by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl SearchResult {
    /// Category name to show, if any. The endpoint sends `""` for
    /// uncategorised articles.
    pub fn category_tag(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed search response: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(String),
}

// ============================================================================
// SearchClient
// ============================================================================

/// Remote lookup behind the live search box.
///
/// Implementations must be shareable with the background task that runs
/// each request.
pub trait SearchClient: Send + Sync + 'static {
    /// Fetch results for an already-trimmed query, in server order.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

/// `GET <endpoint>?q=<query>` over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpSearchClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SearchError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| SearchError::InvalidEndpoint(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SearchError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::new(&config.search_endpoint, config.search_timeout())
    }

    /// The request URL for `query`, with `q` percent-encoded.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }
}

impl SearchClient for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let url = self.request_url(query);
        tracing::trace!(url = %url, "Live search request");

        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| SearchError::Timeout(self.timeout))?
            .map_err(SearchError::Network)?;

        if !response.status().is_success() {
            return Err(SearchError::HttpStatus(response.status().as_u16()));
        }

        let body = read_limited_body(response, MAX_RESPONSE_SIZE).await?;
        let parsed: SearchResponse = serde_json::from_slice(&body)?;
        Ok(parsed.results)
    }
}

async fn read_limited_body(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, SearchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(SearchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(SearchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(SearchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
