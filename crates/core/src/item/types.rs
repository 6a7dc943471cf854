//! Types for items fetched from the item API.

use serde::{Deserialize, Serialize};

/// Numeric item identifier, assigned by the remote service.
pub type ItemId = u64;

/// Base URL of the discussion page for an item.
const DISCUSSION_URL: &str = "https://news.ycombinator.com/item?id=";

/// Item type tag as reported by the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Job,
    Poll,
    #[serde(rename = "pollopt")]
    PollOpt,
    /// Any tag this crate does not know about.
    #[serde(other)]
    Unknown,
}

/// A single item from the item graph.
///
/// Only the fields the search and presentation need are kept. Everything but
/// `id` is optional: deleted items come back with little more than an ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Creation time, Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Deleted and dead items are never shown.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dead: bool,
}

/// A validated story, as handed to presentation code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Story {
    /// Stable ID, usable as a list key.
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub score: u32,
    /// Creation time, Unix seconds.
    pub time: i64,
}

impl Story {
    /// Where the story should link to: the submitted URL, or the discussion
    /// page for text posts (Ask HN and friends) that have none.
    pub fn link(&self) -> String {
        match &self.url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("{}{}", DISCUSSION_URL, self.id),
        }
    }
}

impl From<Item> for Story {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title.unwrap_or_default(),
            url: item.url,
            score: item.score.unwrap_or(0),
            time: item.time.unwrap_or(0),
        }
    }
}
