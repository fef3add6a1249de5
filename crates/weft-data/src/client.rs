//! Fetch client for the upstream REST endpoint.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or connection failure reaching the upstream.
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with an HTTP error status.
    #[error("HTTP error: {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body is not valid JSON for the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether this error came from the transport rather than decoding.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

/// Client for the upstream node's REST endpoint.
///
/// Wraps a pooled `reqwest::Client`, which is safe for concurrent use
/// across requests. Each fetch is a fresh network call; there is no retry
/// and no caching. The per-request timeout defaults to `None`, leaving
/// only the transport's own behavior.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base: String,
    timeout: Option<Duration>,
}

impl FetchClient {
    /// Create a client for the given upstream base URL.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
            timeout: None,
        }
    }

    /// Set a total timeout applied to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Upstream base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Issue one GET request and return the full response body.
    ///
    /// Sends `Accept: application/json`. The connection is released on
    /// every exit path: the body is either fully read or dropped with the
    /// response. Statuses >= 400 are reported as [`FetchError::Status`].
    pub async fn get_raw(&self, route: &str) -> Result<Bytes, FetchError> {
        let url = format!("{}{}", self.base, route);
        debug!(%url, "fetching upstream");

        let mut request = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { url, source })
    }

    /// Fetch and decode in one call.
    pub async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, FetchError> {
        let body = self.get_raw(route).await?;
        decode_json(&body)
    }
}

/// Decode a fetched body into a typed value.
///
/// Kept separate from the fetch itself so malformed JSON surfaces as
/// [`FetchError::Decode`], distinct from transport failures.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
    Ok(serde_json::from_slice(bytes)?)
}
