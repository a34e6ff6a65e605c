//! HTTP client for the Hacker News Firebase API.
//!
//! Calls `GET {base}/item/{id}.json` and `GET {base}/{category}.json`.
//! A single configured client is shared by every tool in the process.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::item::{Item, ItemId, StoryCategory};
use super::ItemSource;
use crate::config::ClientConfig;
use crate::error::{HackerNewsError, Result};

/// Hacker News API client
#[derive(Debug, Clone)]
pub struct HackerNewsClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HackerNewsClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(ref user_agent) = config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder.build().map_err(|e| {
            HackerNewsError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    /// Client against the public API with default settings
    pub fn with_defaults() -> Result<Self> {
        Self::new(&ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `/item/{id}.json`. A JSON `null` body means the item does not exist.
    pub async fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        self.get_json(&format!("/item/{}.json", id)).await
    }

    /// GET `/{category}.json`, the ranked identifier list of one story category.
    pub async fn get_story_ids(&self, category: StoryCategory) -> Result<Vec<ItemId>> {
        self.get_json(&format!("/{}.json", category.endpoint())).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HackerNewsError::Status {
                url,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        serde_json::from_slice(&bytes).map_err(|source| HackerNewsError::Decode { url, source })
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> HackerNewsError {
        if err.is_timeout() {
            HackerNewsError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            HackerNewsError::Http(err)
        }
    }
}

#[async_trait]
impl ItemSource for HackerNewsClient {
    type Item = Item;

    async fn fetch_item(&self, id: ItemId) -> Result<Option<Item>> {
        self.get_item(id).await
    }
}
