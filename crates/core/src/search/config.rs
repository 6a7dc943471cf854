//! Story search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the age of a batch is probed after it has been fetched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgeProbe {
    /// Oldest creation time among the batch's items.
    #[default]
    Oldest,
    /// Creation time of the last item in the batch.
    /// Only equals `Oldest` when the batch is ordered newest-first.
    LastItem,
}

/// Upper bound on `batch_size`, and so on requests in flight at once.
pub const MAX_BATCH_SIZE: usize = 40;

/// Configuration for the adaptive story search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum IDs requested per batch (and so maximum requests in flight).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Target result count; the final list is truncated to this size.
    #[serde(default = "default_max_stories")]
    pub max_stories: usize,

    /// Minimum score for an item to be kept.
    #[serde(default = "default_min_score")]
    pub min_score: u32,

    /// Items older than this (relative to search start) are dropped,
    /// and a batch this old stops the scan.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    #[serde(default)]
    pub age_probe: AgeProbe,

    /// Deadline for a whole search in seconds (0 = no deadline).
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
}

fn default_batch_size() -> usize {
    40
}

fn default_max_stories() -> usize {
    20
}

fn default_min_score() -> u32 {
    70
}

fn default_max_age() -> u64 {
    4 * 60 * 60 // 4 hours
}

fn default_deadline() -> u64 {
    120
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_stories: default_max_stories(),
            min_score: default_min_score(),
            max_age_secs: default_max_age(),
            age_probe: AgeProbe::default(),
            deadline_secs: default_deadline(),
        }
    }
}

impl SearchConfig {
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        (self.deadline_secs > 0).then(|| Duration::from_secs(self.deadline_secs))
    }
}

/// Retry policy for single item lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per lookup, including the first (1 = no retry).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (milliseconds); doubles each retry.
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Upper bound on the delay between retries (milliseconds).
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    200
}

fn default_max_backoff() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}
