// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `Statcard` Core
//!
//! Core types, models, and the rank calculator for the `statcard` crates.
//!
//! This crate has no I/O. It provides:
//!
//! - Domain models produced by the fetchers (stats, repositories,
//!   languages, gists, WakaTime)
//! - The pure [`calculate_rank`] function and its versioned weight table
//! - Error types
//!
//! ## Key Types
//!
//! ### Stats
//! - [`StatsAggregate`] - Aggregated activity totals for one account
//! - [`Rank`] / [`RankLevel`] - Percentile rank and its discrete grade
//! - [`RankInput`] - Metrics consumed by the rank calculator
//!
//! ### Cards
//! - [`RepositoryInfo`] - Single repository (pin card)
//! - [`TopLanguages`] - Aggregated language sizes
//! - [`GistInfo`] - Single gist
//! - [`WakaTimeStats`] - WakaTime coding stats

pub mod error;
pub mod models;
pub mod rank;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Stats
    Rank,
    RankLevel,
    StatsAggregate,
    // Repository & gist cards
    GistInfo,
    PrimaryLanguage,
    RepositoryInfo,
    // Languages
    Language,
    TopLanguages,
    // WakaTime
    WakaTimeLanguage,
    WakaTimeStats,
};

// Re-export the rank calculator
pub use rank::{RankInput, RankWeights, calculate_rank};
