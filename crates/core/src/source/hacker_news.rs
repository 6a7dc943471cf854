//! Hacker News Firebase API client.
//!
//! The API exposes every item as `/item/<id>.json` and a handful of list
//! endpoints. There is no batch lookup, so items are fetched one at a time.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::item::{Item, ItemId};

use super::{FetchError, ItemSource};

/// Hacker News API client.
pub struct HackerNewsClient {
    client: Client,
    base_url: String,
}

impl HackerNewsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn new_stories_url(&self) -> String {
        format!("{}/newstories.json", self.base_url)
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/item/{}.json", self.base_url, id)
    }

    fn max_item_url(&self) -> String {
        format!("{}/maxitem.json", self.base_url)
    }

    /// GET a JSON document, mapping transport and status failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        id: Option<ItemId>,
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        check_status(response.status(), id)?;

        response
            .json()
            .await
            .map_err(|e| FetchError::Parse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl ItemSource for HackerNewsClient {
    fn name(&self) -> &str {
        "hacker_news"
    }

    async fn new_story_ids(&self) -> Result<Vec<ItemId>, FetchError> {
        let ids: Vec<ItemId> = self.get_json(&self.new_stories_url(), None).await?;
        debug!(count = ids.len(), "Fetched new story IDs");
        Ok(ids)
    }

    async fn item(&self, id: ItemId) -> Result<Option<Item>, FetchError> {
        self.get_json(&self.item_url(id), Some(id)).await
    }

    async fn max_item_id(&self) -> Result<ItemId, FetchError> {
        self.get_json(&self.max_item_url(), None).await
    }
}

fn check_status(status: StatusCode, id: Option<ItemId>) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::Remote {
            status: status.as_u16(),
            id,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::ConnectionFailed(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}
