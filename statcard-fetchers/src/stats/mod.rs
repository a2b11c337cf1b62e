//! Account stats: profile totals, stars across repositories, commits.
//!
//! - [`fetcher`] - the paginated aggregator
//! - [`commits`] - all-time commit lookup and username validation

pub mod commits;
pub mod fetcher;
mod query;

pub use commits::{COMMIT_SEARCH_ACCEPT, fetch_total_commits, validate_username};
pub use fetcher::{StatsAggregator, StatsRequest, fetch_stats};
pub use query::{REPOS_QUERY, STATS_QUERY};
