//! HTTP GET as an injectable capability.
//!
//! Resolvers never talk to `reqwest` directly; they receive an
//! `Arc<dyn HttpFetch>` at construction so tests can substitute a fake
//! transport without touching the network.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Status and body of a completed upstream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request could not be completed: no status line was received.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Http(reqwest::Error),

    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries the API key as a query parameter.
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable(err.without_url().to_string())
        } else {
            FetchError::Http(err.without_url())
        }
    }
}

#[async_trait]
pub trait HttpFetch: Send + Sync + Debug {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// [`HttpFetch`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    http: Client,
}

impl ReqwestFetcher {
    /// Every request made through this fetcher is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let res = self.http.get(url.clone()).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(FetchResponse { status, body })
    }
}
