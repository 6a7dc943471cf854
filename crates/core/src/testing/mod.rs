//! Testing utilities and mock implementations.
//!
//! This module provides a mock `ItemSource`, allowing the story search to be
//! exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use freshstories_core::testing::{fixtures, MockItemSource};
//!
//! let source = Arc::new(MockItemSource::new());
//! source.set_backlog(vec![2, 1]).await;
//! source.add_items(fixtures::stories(&[2, 1], 100, now)).await;
//!
//! let search = StorySearch::new(source.clone(), SearchConfig::default(), RetryPolicy::none());
//! ```

mod mock_item_source;

pub use mock_item_source::MockItemSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::item::{Item, ItemId, ItemKind};

    /// Create an item of any kind with a score and creation time.
    pub fn item(id: ItemId, kind: ItemKind, score: u32, time: i64) -> Item {
        Item {
            id,
            kind: Some(kind),
            score: Some(score),
            time: Some(time),
            title: Some(format!("Item {}", id)),
            url: Some(format!("https://example.com/{}", id)),
            deleted: false,
            dead: false,
        }
    }

    /// Create a story with a score and creation time.
    pub fn story(id: ItemId, score: u32, time: i64) -> Item {
        item(id, ItemKind::Story, score, time)
    }

    /// Create one story per ID, all with the same score and time.
    pub fn stories(ids: &[ItemId], score: u32, time: i64) -> Vec<Item> {
        ids.iter().map(|&id| story(id, score, time)).collect()
    }

    /// Create a comment (comments never carry a score).
    pub fn comment(id: ItemId, time: i64) -> Item {
        Item {
            score: None,
            title: None,
            url: None,
            ..item(id, ItemKind::Comment, 0, time)
        }
    }
}
