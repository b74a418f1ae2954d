//! Upstream article index fetching.
//!
//! The article index lives behind a single HTTP endpoint that returns JSON.
//! This module defines the [`ArticleFetcher`] seam the cache refreshes
//! through, plus the production `reqwest` implementation. Tests substitute
//! stub fetchers, so nothing above this layer ever touches the network.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::{Result, TradesiteError};
use crate::domain::RawArticle;

/// Upper bound for one index request, connection included.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of raw article records.
///
/// Implementations return the index as delivered, without normalization or
/// mode filtering; both happen in the cache. Errors are returned to the
/// caller, which decides how to degrade.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    /// Fetches every raw record the index currently serves.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be reached or its response is not
    /// JSON.
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>>;
}

/// Production fetcher talking to the configured index endpoint.
pub struct HttpArticleFetcher {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpArticleFetcher {
    /// Creates a fetcher for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| TradesiteError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch_articles(&self) -> Result<Vec<RawArticle>> {
        tracing::debug!(endpoint = %self.endpoint, "requesting article index");

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| TradesiteError::Fetch(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TradesiteError::Fetch(format!("unexpected status {status}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TradesiteError::Fetch(format!("invalid JSON body: {e}")))?;

        let records = parse_payload(payload);
        tracing::debug!(count = records.len(), "article index received");
        Ok(records)
    }
}

/// Extracts raw records from either accepted payload shape.
///
/// The index endpoint historically returned a bare array and later an object
/// wrapping it in an `articles` field; both remain in the wild. Any other
/// shape yields an empty batch, and malformed elements are skipped
/// individually.
fn parse_payload(payload: Value) -> Vec<RawArticle> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("articles") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<RawArticle>(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!(error = %e, "skipping malformed index entry"),
        }
    }
    records
}
