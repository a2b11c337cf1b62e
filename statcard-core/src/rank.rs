//! Percentile rank calculation.
//!
//! Each metric is divided by a population median and passed through a
//! cumulative distribution function, so a value at the median contributes
//! about half of its weight and huge values saturate instead of dominating.
//! Commits, pull requests, issues and reviews use an exponential CDF
//! (`1 - 2^-x`); stars and followers are far more heavy-tailed and use the
//! flatter `x / (1 + x)`.
//!
//! The weighted mean of the CDF values is the percentile. The grade is
//! picked from the account's top share (`100 - percentile`).
//!
//! The constants form a versioned table ([`RankWeights::V1`]). Changing any
//! of them changes every published rank, so add a new version instead.

use serde::{Deserialize, Serialize};

use crate::models::{Rank, RankLevel};

/// Top-share thresholds, paired with [`RankLevel::all`].
const LEVEL_THRESHOLDS: [f64; 9] = [1.0, 12.5, 25.0, 37.5, 50.0, 62.5, 75.0, 87.5, 100.0];

// ============================================================================
// Input
// ============================================================================

/// Metrics consumed by [`calculate_rank`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankInput {
    /// Whether `commits` is an all-time count rather than the default window.
    pub all_commits: bool,
    /// Commits.
    pub commits: u64,
    /// Pull requests.
    pub prs: u64,
    /// Issues.
    pub issues: u64,
    /// Reviews.
    pub reviews: u64,
    /// Owned repositories. Carries no weight in [`RankWeights::V1`].
    pub repos: u64,
    /// Stars.
    pub stars: u64,
    /// Followers.
    pub followers: u64,
}

// ============================================================================
// Weights
// ============================================================================

/// Medians and weights of the rank model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
    /// Commit median for the default contribution window.
    pub commits_median: f64,
    /// Commit median when counting all-time commits.
    pub all_commits_median: f64,
    /// Commit weight.
    pub commits_weight: f64,
    /// Pull request median.
    pub prs_median: f64,
    /// Pull request weight.
    pub prs_weight: f64,
    /// Issue median.
    pub issues_median: f64,
    /// Issue weight.
    pub issues_weight: f64,
    /// Review median.
    pub reviews_median: f64,
    /// Review weight.
    pub reviews_weight: f64,
    /// Star median.
    pub stars_median: f64,
    /// Star weight.
    pub stars_weight: f64,
    /// Follower median.
    pub followers_median: f64,
    /// Follower weight.
    pub followers_weight: f64,
}

impl RankWeights {
    /// First published table.
    pub const V1: Self = Self {
        commits_median: 250.0,
        all_commits_median: 1000.0,
        commits_weight: 2.0,
        prs_median: 50.0,
        prs_weight: 3.0,
        issues_median: 25.0,
        issues_weight: 1.0,
        reviews_median: 2.0,
        reviews_weight: 1.0,
        stars_median: 50.0,
        stars_weight: 4.0,
        followers_median: 10.0,
        followers_weight: 1.0,
    };

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.commits_weight
            + self.prs_weight
            + self.issues_weight
            + self.reviews_weight
            + self.stars_weight
            + self.followers_weight
    }

    /// Computes the rank of `input` under this table.
    pub fn rank(&self, input: &RankInput) -> Rank {
        let commits_median = if input.all_commits {
            self.all_commits_median
        } else {
            self.commits_median
        };

        let score = self.commits_weight * exponential_cdf(ratio(input.commits, commits_median))
            + self.prs_weight * exponential_cdf(ratio(input.prs, self.prs_median))
            + self.issues_weight * exponential_cdf(ratio(input.issues, self.issues_median))
            + self.reviews_weight * exponential_cdf(ratio(input.reviews, self.reviews_median))
            + self.stars_weight * log_normal_cdf(ratio(input.stars, self.stars_median))
            + self.followers_weight * log_normal_cdf(ratio(input.followers, self.followers_median));

        let percentile = (score / self.total_weight() * 100.0).clamp(0.0, 100.0);

        Rank {
            level: level_for(100.0 - percentile),
            percentile,
        }
    }
}

impl Default for RankWeights {
    fn default() -> Self {
        Self::V1
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Computes the rank of `input` with [`RankWeights::V1`].
pub fn calculate_rank(input: &RankInput) -> Rank {
    RankWeights::V1.rank(input)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(value: u64, median: f64) -> f64 {
    value as f64 / median
}

fn exponential_cdf(x: f64) -> f64 {
    1.0 - 2f64.powf(-x)
}

fn log_normal_cdf(x: f64) -> f64 {
    x / (1.0 + x)
}

fn level_for(top_percent: f64) -> RankLevel {
    LEVEL_THRESHOLDS
        .iter()
        .position(|threshold| top_percent <= *threshold)
        .map_or(RankLevel::C, |i| RankLevel::all()[i])
}

// ============================================================================
// Tests
// ============================================================================
