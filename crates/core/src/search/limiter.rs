//! Result limiter.

/// Keep at most `max` results, in their existing order.
pub fn limit_results<T>(mut results: Vec<T>, max: usize) -> Vec<T> {
    results.truncate(max);
    results
}
