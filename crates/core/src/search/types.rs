//! Types for the story search.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::Story;
use crate::source::FetchError;

/// The two scan strategies, run in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Scan of the backlog of new story IDs.
    KnownIds,
    /// Descending scan of consecutive IDs below the backlog.
    BruteForce,
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::KnownIds => write!(f, "known_ids"),
            SearchPhase::BruteForce => write!(f, "brute_force"),
        }
    }
}

/// Why a phase stopped fetching.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Enough stories accumulated.
    TargetReached,
    /// The last batch was older than the cutoff.
    TooOld,
    /// Every backlog ID has been fetched.
    BacklogExhausted,
    /// No IDs left below the scan position.
    IdSpaceExhausted,
}

/// Counters for a single phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseStats {
    pub phase: SearchPhase,
    /// Batches fetched.
    pub batches: u32,
    /// IDs looked up (one per lookup, retries not counted).
    pub items_requested: usize,
    /// Stories accepted into the result set.
    pub accepted: usize,
    pub stop: StopReason,
}

impl PhaseStats {
    pub(crate) fn new(phase: SearchPhase) -> Self {
        Self {
            phase,
            batches: 0,
            items_requested: 0,
            accepted: 0,
            stop: StopReason::BacklogExhausted,
        }
    }
}

/// Statistics for a whole search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchStats {
    pub known_ids: PhaseStats,
    /// Present only if the brute-force phase ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brute_force: Option<PhaseStats>,
    /// Largest batch requested in either phase.
    pub largest_batch: usize,
    /// Stories found before truncation.
    pub accumulated: usize,
}

impl SearchStats {
    pub fn total_batches(&self) -> u32 {
        self.known_ids.batches + self.brute_force.as_ref().map_or(0, |p| p.batches)
    }

    /// Why the search as a whole stopped.
    pub fn stop(&self) -> StopReason {
        self.brute_force
            .as_ref()
            .map_or(self.known_ids.stop, |p| p.stop)
    }
}

/// Result of one search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Search start; every age comparison is relative to it.
    pub started_at: DateTime<Utc>,
    /// Stories in discovery order, at most `max_stories`.
    pub stories: Vec<Story>,
    pub stats: SearchStats,
}

/// Errors that abort a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Search did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl SearchError {
    /// The underlying fetch error, if the search failed on a lookup.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            SearchError::Fetch(e) => Some(e),
            SearchError::DeadlineExceeded(_) => None,
        }
    }
}
