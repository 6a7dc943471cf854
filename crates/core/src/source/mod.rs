//! Item source abstraction.
//!
//! This module provides an `ItemSource` trait for looking up items one ID at
//! a time, plus the Hacker News Firebase API implementation.

mod hacker_news;

pub use hacker_news::HackerNewsClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::item::{Item, ItemId};

/// Errors that can occur while fetching from the item API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The API answered with a non-success status.
    #[error("Remote fetch failed: HTTP {status}{}", item_suffix(.id))]
    Remote { status: u16, id: Option<ItemId> },

    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn item_suffix(id: &Option<ItemId>) -> String {
    id.map(|i| format!(" for item {}", i)).unwrap_or_default()
}

impl FetchError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the same request could succeed if tried again.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Remote { status, .. } => *status == 429 || *status >= 500,
            FetchError::Timeout | FetchError::ConnectionFailed(_) => true,
            FetchError::Transport(_) | FetchError::Parse(_) | FetchError::Internal(_) => false,
        }
    }
}

/// Trait for item lookup backends.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// The newest-first list of recently created story IDs.
    async fn new_story_ids(&self) -> Result<Vec<ItemId>, FetchError>;

    /// Look up one item. `Ok(None)` means the service has no item under this ID.
    async fn item(&self, id: ItemId) -> Result<Option<Item>, FetchError>;

    /// The largest item ID currently assigned.
    async fn max_item_id(&self) -> Result<ItemId, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let err = FetchError::Remote {
            status: 503,
            id: Some(1),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(FetchError::Timeout.status(), None);
    }

    #[test]
    fn test_is_retryable() {
        assert!(FetchError::Remote { status: 500, id: None }.is_retryable());
        assert!(FetchError::Remote { status: 429, id: None }.is_retryable());
        assert!(!FetchError::Remote { status: 404, id: None }.is_retryable());
        assert!(!FetchError::Remote { status: 401, id: None }.is_retryable());
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::ConnectionFailed("refused".to_string()).is_retryable());
        assert!(!FetchError::Parse("eof".to_string()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = FetchError::Remote {
            status: 502,
            id: Some(42),
        };
        assert_eq!(err.to_string(), "Remote fetch failed: HTTP 502 for item 42");

        let err = FetchError::Remote {
            status: 500,
            id: None,
        };
        assert_eq!(err.to_string(), "Remote fetch failed: HTTP 500");
    }
}
