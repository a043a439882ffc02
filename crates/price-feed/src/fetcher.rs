//! HTTP ticker fetcher

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

use scraper_core::{FeedError, FeedResult};

/// Source of raw exchange response bodies.
///
/// Best effort: a failed request yields an empty body and is logged, it is
/// never an error for the caller. Non-2xx bodies are passed through as-is.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, exchange: &str, url: &str) -> Vec<u8>;
}

/// reqwest-based fetcher. No timeout, no retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> FeedResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| FeedError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, %status, "Non-success status, passing body through");
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, exchange: &str, url: &str) -> Vec<u8> {
        match self.try_fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                let err = FeedError::Transport {
                    exchange: exchange.to_string(),
                    reason: e.to_string(),
                };
                warn!(exchange, error = %err, "Fetch failed");
                Vec::new()
            }
        }
    }
}

/// Serves canned bodies by URL, for offline runs and tests.
///
/// Unknown URLs behave like an unreachable exchange: an empty body.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    bodies: RwLock<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.set_body(url, body);
        self
    }

    pub fn set_body(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.write().insert(url.into(), body.into());
    }

    /// Number of `fetch` calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, exchange: &str, url: &str) -> Vec<u8> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.bodies.read().get(url) {
            Some(body) => body.clone(),
            None => {
                warn!(exchange, url, "No canned response");
                Vec::new()
            }
        }
    }
}
