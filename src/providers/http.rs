//! HTTP page fetching

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::time::Duration;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Hard ceiling for page size (5MB); larger pages are rejected
const MAX_CONTENT_SIZE: usize = 5 * 1024 * 1024;

const USER_AGENT: &str = "workspace-vars/0.1";

/// Fetches a page body as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed fetcher with a timeout and a body size cap.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    max_content_size: usize,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_content_size: MAX_CONTENT_SIZE,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed_url = url::Url::parse(url)
            .map_err(|e| Error::Validation(format!("Invalid URL '{}': {}", url, e)))?;

        // Only allow http and https schemes
        if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
            return Err(Error::Validation(format!(
                "URL scheme '{}' not allowed. Only http and https are supported.",
                parsed_url.scheme()
            )));
        }

        tracing::debug!(url = %parsed_url, "Fetching page");
        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("Failed to fetch {}: status {}", url, status)));
        }

        let body_bytes = read_capped(response.bytes_stream(), self.max_content_size, url).await?;
        Ok(String::from_utf8_lossy(&body_bytes).into_owned())
    }
}

/// Collects a response body, failing once it grows past `max_size` bytes so a
/// partial page is never parsed.
async fn read_capped<S, E>(stream: S, max_size: usize, url: &str) -> Result<Vec<u8>>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut body = Vec::new();

    while let Some(item) = stream.next().await {
        let chunk = item.map_err(|e| Error::Http(format!("Failed to read response chunk: {}", e)))?;
        if body.len() + chunk.len() > max_size {
            return Err(Error::Http(format!(
                "Listing {} exceeds size limit of {} bytes",
                url, max_size
            )));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
