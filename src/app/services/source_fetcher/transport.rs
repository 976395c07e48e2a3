//! HTTP transport abstraction
//!
//! The fetcher only needs "GET this URL as text". Keeping that behind a trait
//! lets tests and offline runs substitute canned responses for the network.

use crate::{Error, Result};
use async_trait::async_trait;
use tracing::debug;

/// Minimal async HTTP GET
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` and return the response body
    ///
    /// # Errors
    /// `Error::HttpStatus` for a non-success status, `Error::Http` when the
    /// request could not be made or the body could not be read.
    async fn get(&self, url: &str) -> Result<String>;
}

/// Transport backed by a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        response.text().await.map_err(|e| Error::http(url, e))
    }
}
