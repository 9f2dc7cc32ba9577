//! HTTP fetcher for downloading remote block-lists.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::sources::Source;

/// Result of fetching one source: its lines, or a recorded failure.
/// A failed source never aborts the run; it contributes zero candidates.
#[derive(Debug)]
pub struct FetchResult {
    pub source: Source,
    pub lines: Vec<String>,
    pub failure: Option<String>,
}

impl FetchResult {
    fn failed(source: Source, reason: String) -> Self {
        Self {
            source,
            lines: Vec::new(),
            failure: Some(reason),
        }
    }
}

/// HTTP client for fetching source lists
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a new fetcher with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("hostsmith/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch a single source and split the body into lines.
    ///
    /// The body is treated as line-oriented text with no stronger encoding
    /// assumption; invalid UTF-8 is replaced, not rejected.
    pub async fn fetch_source(&self, source: &Source) -> FetchResult {
        match self.client.get(&source.url).send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    warn!("Skipping {} (HTTP {})", source.url, status.as_u16());
                    return FetchResult::failed(source.clone(), format!("HTTP {}", status));
                }
                match response.bytes().await {
                    Ok(body) => {
                        let text = String::from_utf8_lossy(&body);
                        let lines: Vec<String> = text.lines().map(str::to_string).collect();
                        info!("Fetched {} - {} lines", source.url, lines.len());
                        FetchResult {
                            source: source.clone(),
                            lines,
                            failure: None,
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read body from {}: {}", source.url, e);
                        FetchResult::failed(source.clone(), e.to_string())
                    }
                }
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", source.url, e);
                FetchResult::failed(source.clone(), e.to_string())
            }
        }
    }

    /// Fetch multiple sources concurrently with limited parallelism.
    ///
    /// Bounded to avoid resource exhaustion and rate limiting from the
    /// upstream list servers.
    pub async fn fetch_sources(&self, sources: &[Source], max_concurrent: usize) -> Vec<FetchResult> {
        stream::iter(sources.iter().map(|source| self.fetch_source(source)))
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await
    }
}
