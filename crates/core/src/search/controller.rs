//! Adaptive story search.
//!
//! Runs two phases against an `ItemSource`:
//! - Known IDs: the newest-stories backlog, in fixed-size windows
//! - Brute force: consecutive IDs descending from just below the backlog,
//!   keeping stories only
//!
//! Batches run strictly one after another, so at most `batch_size` lookups
//! are ever in flight. Any failed batch aborts the search.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::item::{Item, ItemId, ItemKind, Story};
use crate::source::{FetchError, ItemSource};

use super::batch::BatchFetcher;
use super::config::{AgeProbe, SearchConfig};
use super::filter::{filter_valid, Cutoff, FilterCriteria};
use super::limiter::limit_results;
use super::retry::RetryPolicy;
use super::types::{PhaseStats, SearchError, SearchPhase, SearchReport, SearchStats, StopReason};

/// Results gathered over one search.
struct Accumulator {
    items: Vec<Item>,
    seen: HashSet<ItemId>,
    /// Age probe of the most recent batch, Unix seconds.
    probe: i64,
    largest_batch: usize,
}

impl Accumulator {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            probe: now.timestamp(),
            largest_batch: 0,
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    /// Update the probe from `batch` and append its valid, unseen items.
    /// Returns how many items were appended.
    fn absorb(
        &mut self,
        batch: Vec<Option<Item>>,
        criteria: &FilterCriteria,
        mode: AgeProbe,
    ) -> usize {
        if let Some(time) = probe_time(&batch, mode) {
            self.probe = time;
        }

        let before = self.items.len();
        for item in filter_valid(batch, criteria) {
            if self.seen.insert(item.id) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }
}

/// Age of a batch under `mode`. `None` if no item in the batch has a time.
fn probe_time(batch: &[Option<Item>], mode: AgeProbe) -> Option<i64> {
    let mut times = batch.iter().flatten().filter_map(|item| item.time);
    match mode {
        AgeProbe::Oldest => times.min(),
        AgeProbe::LastItem => times.last(),
    }
}

/// Up to `count` consecutive IDs strictly below `below`, descending, never below 1.
fn descending_ids(below: ItemId, count: usize) -> Vec<ItemId> {
    (1..below).rev().take(count).collect()
}

/// The adaptive story search.
pub struct StorySearch {
    fetcher: BatchFetcher,
    config: SearchConfig,
}

impl StorySearch {
    pub fn new(source: Arc<dyn ItemSource>, config: SearchConfig, retry: RetryPolicy) -> Self {
        Self {
            fetcher: BatchFetcher::new(source, retry),
            config,
        }
    }

    /// Build a search from the application config.
    pub fn from_config(source: Arc<dyn ItemSource>, config: &Config) -> Self {
        Self::new(
            source,
            config.search.clone(),
            RetryPolicy::from(&config.retry),
        )
    }

    /// Fetch the current list of fresh, high-scoring stories.
    pub async fn fetch_current_stories(&self) -> Result<Vec<Story>, SearchError> {
        Ok(self.run_at(Utc::now()).await?.stories)
    }

    /// Run a search as of `now`. The age cutoff is derived from `now` once
    /// and held for the whole search.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SearchReport, SearchError> {
        let report = match self.config.deadline() {
            Some(deadline) => tokio::time::timeout(deadline, self.search(now))
                .await
                .map_err(|_| SearchError::DeadlineExceeded(deadline))??,
            None => self.search(now).await?,
        };

        info!(
            stories = report.stories.len(),
            accumulated = report.stats.accumulated,
            batches = report.stats.total_batches(),
            stop = ?report.stats.stop(),
            "Story search complete"
        );

        Ok(report)
    }

    async fn search(&self, now: DateTime<Utc>) -> Result<SearchReport, FetchError> {
        let cutoff = Cutoff::new(now, self.config.max_age());
        let source = self.fetcher.source();

        let backlog = source.new_story_ids().await?;
        info!(
            source = source.name(),
            backlog = backlog.len(),
            cutoff_ms = cutoff.oldest_allowed_ms(),
            "Starting story search"
        );

        let mut acc = Accumulator::new(now);
        let known_ids = self.scan_known_ids(&backlog, cutoff, &mut acc).await?;

        let brute_force = if acc.len() < self.config.max_stories && !cutoff.is_too_old(acc.probe)
        {
            let start = match backlog.iter().min() {
                Some(&min) => min,
                None => source.max_item_id().await?.saturating_add(1),
            };
            Some(self.scan_descending(start, cutoff, &mut acc).await?)
        } else {
            None
        };

        let stats = SearchStats {
            known_ids,
            brute_force,
            largest_batch: acc.largest_batch,
            accumulated: acc.len(),
        };

        let stories = limit_results(acc.items, self.config.max_stories)
            .into_iter()
            .map(Story::from)
            .collect();

        Ok(SearchReport {
            started_at: now,
            stories,
            stats,
        })
    }

    /// Scan the backlog in consecutive windows of up to `batch_size` IDs.
    async fn scan_known_ids(
        &self,
        backlog: &[ItemId],
        cutoff: Cutoff,
        acc: &mut Accumulator,
    ) -> Result<PhaseStats, FetchError> {
        let criteria = FilterCriteria {
            min_score: self.config.min_score,
            cutoff,
            kind: None,
        };
        let batch_size = self.config.batch_size;
        let mut stats = PhaseStats::new(SearchPhase::KnownIds);
        let mut consumed = 0;

        loop {
            let end = (consumed + batch_size).min(backlog.len());
            let window = &backlog[consumed..end];
            if window.is_empty() {
                stats.stop = StopReason::BacklogExhausted;
                break;
            }

            self.fetch_batch(window, &criteria, acc, &mut stats).await?;
            consumed = end;

            if let Some(stop) = self.stop_reason(acc, cutoff) {
                stats.stop = stop;
                break;
            }
            // A short window means the backlog is used up.
            if consumed == backlog.len() || window.len() < batch_size {
                stats.stop = StopReason::BacklogExhausted;
                break;
            }
        }

        Ok(stats)
    }

    /// Scan consecutive IDs strictly below `start`, newest first.
    async fn scan_descending(
        &self,
        start: ItemId,
        cutoff: Cutoff,
        acc: &mut Accumulator,
    ) -> Result<PhaseStats, FetchError> {
        let criteria = FilterCriteria {
            min_score: self.config.min_score,
            cutoff,
            kind: Some(ItemKind::Story),
        };
        let mut stats = PhaseStats::new(SearchPhase::BruteForce);
        let mut next = start;

        debug!(start = start, "Starting brute-force scan");

        loop {
            let ids = descending_ids(next, self.config.batch_size);
            let Some(&lowest) = ids.last() else {
                stats.stop = StopReason::IdSpaceExhausted;
                break;
            };

            self.fetch_batch(&ids, &criteria, acc, &mut stats).await?;
            next = lowest;

            if let Some(stop) = self.stop_reason(acc, cutoff) {
                stats.stop = stop;
                break;
            }
            if next <= 1 {
                stats.stop = StopReason::IdSpaceExhausted;
                break;
            }
        }

        Ok(stats)
    }

    async fn fetch_batch(
        &self,
        ids: &[ItemId],
        criteria: &FilterCriteria,
        acc: &mut Accumulator,
        stats: &mut PhaseStats,
    ) -> Result<(), FetchError> {
        let items = self.fetcher.fetch(ids).await?;

        stats.batches += 1;
        stats.items_requested += ids.len();
        acc.largest_batch = acc.largest_batch.max(ids.len());

        let accepted = acc.absorb(items, criteria, self.config.age_probe);
        stats.accepted += accepted;

        debug!(
            phase = %stats.phase,
            batch = stats.batches,
            batch_size = ids.len(),
            accepted = accepted,
            accumulated = acc.len(),
            probe = acc.probe,
            "Batch processed"
        );

        Ok(())
    }

    /// Stop condition shared by both phases.
    fn stop_reason(&self, acc: &Accumulator, cutoff: Cutoff) -> Option<StopReason> {
        if acc.len() >= self.config.max_stories {
            Some(StopReason::TargetReached)
        } else if cutoff.is_too_old(acc.probe) {
            Some(StopReason::TooOld)
        } else {
            None
        }
    }
}
