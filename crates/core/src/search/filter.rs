//! Validity filter for fetched items.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::item::{Item, ItemKind};

/// Milliseconds per second; item times are whole seconds.
const MILLIS_PER_SEC: i64 = 1000;

/// Fixed recency boundary, computed once when a search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    oldest_allowed_ms: i64,
}

impl Cutoff {
    /// Boundary `max_age` before `now`.
    pub fn new(now: DateTime<Utc>, max_age: Duration) -> Self {
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        Self {
            oldest_allowed_ms: now.timestamp_millis().saturating_sub(max_age_ms),
        }
    }

    pub fn oldest_allowed_ms(&self) -> i64 {
        self.oldest_allowed_ms
    }

    /// Whether a Unix-seconds timestamp falls before the boundary.
    pub fn is_too_old(&self, time_secs: i64) -> bool {
        time_secs.saturating_mul(MILLIS_PER_SEC) < self.oldest_allowed_ms
    }
}

/// The constraints an item must meet to be kept.
#[derive(Debug, Clone, Copy)]
pub struct FilterCriteria {
    pub min_score: u32,
    pub cutoff: Cutoff,
    /// When set, only items of this kind pass.
    pub kind: Option<ItemKind>,
}

impl FilterCriteria {
    /// Deleted and dead items never pass, whatever their score.
    pub fn accepts(&self, item: &Item) -> bool {
        if item.deleted || item.dead {
            return false;
        }

        let kind_ok = match self.kind {
            Some(kind) => item.kind == Some(kind),
            None => true,
        };
        let score_ok = item.score.is_some_and(|s| s >= self.min_score);
        let time_ok = item.time.is_some_and(|t| !self.cutoff.is_too_old(t));

        kind_ok && score_ok && time_ok
    }
}

/// Keep the present items that meet `criteria`, preserving order.
pub fn filter_valid(items: Vec<Option<Item>>, criteria: &FilterCriteria) -> Vec<Item> {
    items
        .into_iter()
        .flatten()
        .filter(|item| criteria.accepts(item))
        .collect()
}
