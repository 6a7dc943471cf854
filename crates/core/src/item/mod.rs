//! Item model for the Hacker News item graph.
//!
//! Every entry in the graph (story, comment, job, poll) is an `Item`
//! addressed by a numeric ID. `Story` is the trimmed record handed to
//! presentation code once an item passes the search filters.

mod types;

pub use types::*;
