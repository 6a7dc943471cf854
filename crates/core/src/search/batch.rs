//! Concurrent fan-out of item lookups.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use crate::item::{Item, ItemId};
use crate::source::{FetchError, ItemSource};

use super::retry::RetryPolicy;

/// Fetches a batch of items concurrently through an `ItemSource`.
///
/// All lookups of a batch run on the calling task; the batch resolves once
/// every lookup has, and fails as a whole if any lookup fails after retries.
pub struct BatchFetcher {
    source: Arc<dyn ItemSource>,
    retry: RetryPolicy,
}

impl BatchFetcher {
    pub fn new(source: Arc<dyn ItemSource>, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    pub fn source(&self) -> &dyn ItemSource {
        self.source.as_ref()
    }

    /// Fetch every ID in `ids`; results are in input order.
    pub async fn fetch(&self, ids: &[ItemId]) -> Result<Vec<Option<Item>>, FetchError> {
        debug!(
            source = self.source.name(),
            batch_size = ids.len(),
            first = ids.first().copied(),
            last = ids.last().copied(),
            "Fetching batch"
        );

        let lookups = ids
            .iter()
            .map(|&id| self.retry.run(move || self.source.item(id)));

        try_join_all(lookups).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockItemSource};
    use std::time::Duration;

    #[tokio::test]
    async fn test_fetch_preserves_order_and_absent_items() {
        let source = Arc::new(MockItemSource::new());
        source.add_item(fixtures::story(3, 100, 1_700_000_000)).await;
        source.add_item(fixtures::story(1, 50, 1_700_000_000)).await;

        let fetcher = BatchFetcher::new(source.clone(), RetryPolicy::none());
        let items = fetcher.fetch(&[3, 2, 1]).await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().map(|i| i.id), Some(3));
        assert!(items[1].is_none());
        assert_eq!(items[2].as_ref().map(|i| i.id), Some(1));
    }

    #[tokio::test]
    async fn test_fetch_runs_lookups_concurrently() {
        let source = Arc::new(MockItemSource::new());
        source.set_delay(Duration::from_millis(5)).await;

        let ids: Vec<ItemId> = (1..=40).collect();
        let fetcher = BatchFetcher::new(source.clone(), RetryPolicy::none());
        fetcher.fetch(&ids).await.unwrap();

        assert_eq!(source.peak_in_flight(), 40);
        assert_eq!(source.requested_ids().await.len(), 40);
    }

    #[tokio::test]
    async fn test_single_failure_fails_batch() {
        let source = Arc::new(MockItemSource::new());
        source.add_item(fixtures::story(1, 100, 1_700_000_000)).await;
        source.fail_item(2, 500).await;

        let fetcher = BatchFetcher::new(source.clone(), RetryPolicy::none());
        let err = fetcher.fetch(&[1, 2, 3]).await.unwrap_err();

        assert_eq!(
            err,
            FetchError::Remote {
                status: 500,
                id: Some(2)
            }
        );
    }

    #[tokio::test]
    async fn test_transient_failure_recovered_by_retry() {
        let source = Arc::new(MockItemSource::new());
        source.add_item(fixtures::story(2, 100, 1_700_000_000)).await;
        source.fail_item_times(2, 503, 2).await;

        let retry = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(2));
        let fetcher = BatchFetcher::new(source.clone(), retry);
        let items = fetcher.fetch(&[2]).await.unwrap();

        assert_eq!(items[0].as_ref().map(|i| i.id), Some(2));
        assert_eq!(source.requested_ids().await, vec![2, 2, 2]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let source = Arc::new(MockItemSource::new());
        let fetcher = BatchFetcher::new(source.clone(), RetryPolicy::none());
        let items = fetcher.fetch(&[]).await.unwrap();
        assert!(items.is_empty());
        assert!(source.requested_ids().await.is_empty());
    }
}
