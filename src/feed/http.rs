//! HTTP JSON results poller

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::dedup::OutcomeDeduplicator;
use crate::common::errors::{MonitorError, Result};
use crate::common::traits::OutcomeSource;
use crate::common::types::{Outcome, RawOutcome};
use crate::config::types::FeedConfig;

/// Body returned by the results endpoint, most recent entry first
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub results: Vec<RawOutcome>,
}

/// Polls a JSON endpoint and yields each new latest outcome once
#[derive(Debug, Clone)]
pub struct HttpOutcomeSource {
    /// HTTP client
    client: Client,
    /// Results endpoint
    url: String,
    dedup: OutcomeDeduplicator,
}

impl HttpOutcomeSource {
    /// Create a new source with the default 30 second timeout
    pub fn new(url: &str) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    /// Create a new source with custom timeout
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
            dedup: OutcomeDeduplicator::new(),
        })
    }

    /// Build from the feed section; the URL is required here
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| MonitorError::Configuration("feed url is not set".to_string()))?;
        Self::with_timeout(url, Duration::from_secs(config.request_timeout_seconds))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the newest raw entry, without deduplication
    #[instrument(skip(self))]
    pub async fn fetch_latest(&self) -> Result<Option<RawOutcome>> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::InvalidResponse(format!(
                "Feed returned status {}: {}",
                status, body
            )));
        }

        let feed: FeedResponse = response.json().await?;
        debug!(entries = feed.results.len(), "Feed fetched");
        Ok(feed.results.into_iter().next())
    }
}

#[async_trait]
impl OutcomeSource for HttpOutcomeSource {
    async fn poll_for_new_outcome(&mut self) -> Result<Option<Outcome>> {
        let Some(raw) = self.fetch_latest().await? else {
            debug!("Feed returned no results");
            return Ok(None);
        };

        let outcome = raw.validate()?;
        Ok(self.dedup.accept(outcome))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
