//! Fresh story search.
//!
//! This module provides `StorySearch`, which pages through the item API in
//! bounded batches until it has enough recent, high-scoring stories or the
//! items it sees are too old to qualify.

mod batch;
mod config;
mod controller;
mod filter;
mod limiter;
mod retry;
mod types;

pub use batch::BatchFetcher;
pub use config::{AgeProbe, RetryConfig, SearchConfig, MAX_BATCH_SIZE};
pub use controller::StorySearch;
pub use filter::{filter_valid, Cutoff, FilterCriteria};
pub use limiter::limit_results;
pub use retry::RetryPolicy;
pub use types::*;
