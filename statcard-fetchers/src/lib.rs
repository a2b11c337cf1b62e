// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Statcard Fetchers
//!
//! Card data fetchers built on [`statcard_fetch`].
//!
//! ## Fetchers
//!
//! | Fetcher | Output | Source |
//! |---------|--------|--------|
//! | [`fetch_stats`] | [`StatsAggregate`](statcard_core::StatsAggregate) | GraphQL + commit search |
//! | [`fetch_repo`] | [`RepositoryInfo`](statcard_core::RepositoryInfo) | GraphQL |
//! | [`fetch_top_languages`] | [`TopLanguages`](statcard_core::TopLanguages) | GraphQL |
//! | [`fetch_gist`] | [`GistInfo`](statcard_core::GistInfo) | GraphQL |
//! | [`fetch_wakatime_stats`] | [`WakaTimeStats`](statcard_core::WakaTimeStats) | WakaTime REST |
//!
//! Every fetcher takes a [`FetchContext`](statcard_fetch::FetchContext) and
//! returns a [`FetcherError`] on failure.

pub mod error;
pub mod gist;
pub mod repo;
pub mod stats;
pub mod top_languages;
pub mod wakatime;

pub use error::{ErrorKind, FetcherError, RepositoryOwner};
pub use gist::fetch_gist;
pub use repo::fetch_repo;
pub use stats::{StatsAggregator, StatsRequest, fetch_stats, fetch_total_commits, validate_username};
pub use top_languages::{LanguageWeights, fetch_top_languages};
pub use wakatime::fetch_wakatime_stats;
