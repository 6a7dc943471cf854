//! Mock item source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::item::{Item, ItemId};
use crate::source::{FetchError, ItemSource};

/// An item handler that produces items dynamically based on the ID.
type ItemHandler = Box<dyn Fn(ItemId) -> Option<Item> + Send + Sync>;

/// An injected lookup failure.
#[derive(Debug, Clone)]
struct InjectedFailure {
    status: u16,
    /// Failures left before lookups succeed again; `None` fails forever.
    remaining: Option<u32>,
}

/// Mock implementation of the ItemSource trait.
///
/// Provides controllable behavior for testing:
/// - Serve a configurable backlog and item set
/// - Generate items on the fly from a handler
/// - Simulate failures (permanent or transient) and latency
/// - Track requested IDs and peak concurrency for assertions
///
/// # Example
///
/// ```rust,ignore
/// use freshstories_core::testing::{MockItemSource, fixtures};
///
/// let source = MockItemSource::new();
/// source.set_backlog(vec![3, 2, 1]).await;
/// source.add_item(fixtures::story(3, 120, now)).await;
/// source.fail_item(2, 503).await;
///
/// let item = source.item(3).await?;
/// assert_eq!(source.requested_ids().await, vec![3]);
/// ```
pub struct MockItemSource {
    backlog: Arc<RwLock<Vec<ItemId>>>,
    items: Arc<RwLock<HashMap<ItemId, Item>>>,
    max_item_id: Arc<RwLock<Option<ItemId>>>,
    handler: Arc<RwLock<Option<ItemHandler>>>,
    failures: Arc<RwLock<HashMap<ItemId, InjectedFailure>>>,
    backlog_error: Arc<RwLock<Option<FetchError>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    requested: Arc<RwLock<Vec<ItemId>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MockItemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockItemSource")
            .field("backlog", &"<backlog>")
            .field("items", &"<items>")
            .field("handler", &"<handler>")
            .field("failures", &"<failures>")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

impl Default for MockItemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockItemSource {
    /// Create a new mock source with an empty backlog and no items.
    pub fn new() -> Self {
        Self {
            backlog: Arc::new(RwLock::new(Vec::new())),
            items: Arc::new(RwLock::new(HashMap::new())),
            max_item_id: Arc::new(RwLock::new(None)),
            handler: Arc::new(RwLock::new(None)),
            failures: Arc::new(RwLock::new(HashMap::new())),
            backlog_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
            requested: Arc::new(RwLock::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the newest-first backlog returned by `new_story_ids`.
    pub async fn set_backlog(&self, ids: Vec<ItemId>) {
        *self.backlog.write().await = ids;
    }

    /// Add a single item.
    pub async fn add_item(&self, item: Item) {
        self.items.write().await.insert(item.id, item);
    }

    /// Add several items.
    pub async fn add_items(&self, items: impl IntoIterator<Item = Item>) {
        let mut map = self.items.write().await;
        for item in items {
            map.insert(item.id, item);
        }
    }

    /// Set the value returned by `max_item_id`.
    /// Defaults to the largest known item or backlog ID.
    pub async fn set_max_item_id(&self, id: ItemId) {
        *self.max_item_id.write().await = Some(id);
    }

    /// Set a handler consulted for IDs not added explicitly.
    pub async fn set_item_handler<F>(&self, handler: F)
    where
        F: Fn(ItemId) -> Option<Item> + Send + Sync + 'static,
    {
        *self.handler.write().await = Some(Box::new(handler));
    }

    /// Make every lookup of `id` fail with `status`.
    pub async fn fail_item(&self, id: ItemId, status: u16) {
        self.failures.write().await.insert(
            id,
            InjectedFailure {
                status,
                remaining: None,
            },
        );
    }

    /// Make the next `times` lookups of `id` fail with `status`.
    pub async fn fail_item_times(&self, id: ItemId, status: u16, times: u32) {
        self.failures.write().await.insert(
            id,
            InjectedFailure {
                status,
                remaining: Some(times),
            },
        );
    }

    /// Make `new_story_ids` fail with the given error.
    pub async fn fail_backlog(&self, error: FetchError) {
        *self.backlog_error.write().await = Some(error);
    }

    /// Delay every item lookup by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// IDs looked up so far, in call order (retries included).
    pub async fn requested_ids(&self) -> Vec<ItemId> {
        self.requested.read().await.clone()
    }

    /// Number of item lookups performed.
    pub async fn request_count(&self) -> usize {
        self.requested.read().await.len()
    }

    /// Highest number of lookups that were in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Consume one injected failure for `id`, if any.
    async fn take_failure(&self, id: ItemId) -> Option<u16> {
        let mut failures = self.failures.write().await;
        let (status, remaining) = {
            let failure = failures.get(&id)?;
            (failure.status, failure.remaining)
        };
        match remaining {
            None => Some(status),
            Some(0) => {
                failures.remove(&id);
                None
            }
            Some(1) => {
                failures.remove(&id);
                Some(status)
            }
            Some(n) => {
                if let Some(failure) = failures.get_mut(&id) {
                    failure.remaining = Some(n - 1);
                }
                Some(status)
            }
        }
    }

    async fn lookup(&self, id: ItemId) -> Result<Option<Item>, FetchError> {
        self.requested.write().await.push(id);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(status) = self.take_failure(id).await {
            return Err(FetchError::Remote {
                status,
                id: Some(id),
            });
        }

        if let Some(item) = self.items.read().await.get(&id) {
            return Ok(Some(item.clone()));
        }

        let handler = self.handler.read().await;
        Ok(handler.as_ref().and_then(|h| h(id)))
    }
}

#[async_trait]
impl ItemSource for MockItemSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn new_story_ids(&self) -> Result<Vec<ItemId>, FetchError> {
        if let Some(err) = self.backlog_error.read().await.clone() {
            return Err(err);
        }
        Ok(self.backlog.read().await.clone())
    }

    async fn item(&self, id: ItemId) -> Result<Option<Item>, FetchError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = self.lookup(id).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn max_item_id(&self) -> Result<ItemId, FetchError> {
        if let Some(id) = *self.max_item_id.read().await {
            return Ok(id);
        }
        let max_item = self.items.read().await.keys().max().copied();
        let max_backlog = self.backlog.read().await.iter().max().copied();
        Ok(max_item.max(max_backlog).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_serves_items_and_absent() {
        let source = MockItemSource::new();
        source.add_item(fixtures::story(1, 100, 0)).await;

        assert_eq!(source.item(1).await.unwrap().map(|i| i.id), Some(1));
        assert!(source.item(2).await.unwrap().is_none());
        assert_eq!(source.requested_ids().await, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_handler_for_unknown_ids() {
        let source = MockItemSource::new();
        source
            .set_item_handler(|id| (id % 2 == 0).then(|| fixtures::story(id, 80, 0)))
            .await;

        assert!(source.item(4).await.unwrap().is_some());
        assert!(source.item(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transient_failure_clears() {
        let source = MockItemSource::new();
        source.add_item(fixtures::story(1, 100, 0)).await;
        source.fail_item_times(1, 502, 1).await;

        assert_eq!(source.item(1).await.unwrap_err().status(), Some(502));
        assert!(source.item(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_max_item_id_defaults_to_largest_known() {
        let source = MockItemSource::new();
        source.set_backlog(vec![30, 20]).await;
        source.add_item(fixtures::story(25, 100, 0)).await;
        assert_eq!(source.max_item_id().await.unwrap(), 30);

        source.set_max_item_id(99).await;
        assert_eq!(source.max_item_id().await.unwrap(), 99);
    }

    #[tokio::test]
    async fn test_backlog_error() {
        let source = MockItemSource::new();
        source.fail_backlog(FetchError::Timeout).await;
        assert_eq!(source.new_story_ids().await.unwrap_err(), FetchError::Timeout);
    }
}
