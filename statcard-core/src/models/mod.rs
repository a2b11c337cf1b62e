//! Domain models for `statcard`.
//!
//! ## Submodules
//!
//! - [`stats`] - Aggregated account stats and rank
//! - [`repo`] - Repository and gist card data
//! - [`languages`] - Top language aggregation
//! - [`wakatime`] - WakaTime coding stats

mod languages;
mod repo;
mod stats;
mod wakatime;

// Re-export everything at the models level
pub use languages::{Language, TopLanguages};
pub use repo::{GistInfo, PrimaryLanguage, RepositoryInfo};
pub use stats::{Rank, RankLevel, StatsAggregate};
pub use wakatime::{WakaTimeLanguage, WakaTimeStats};

#[cfg(test)]
mod serde_tests;
