//! Stats-related types.
//!
//! - [`StatsAggregate`] - Totals for one account, assembled by the stats fetcher
//! - [`Rank`] - Percentile and discrete grade derived from the totals
//! - [`RankLevel`] - The ordered grades

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Rank Level
// ============================================================================

/// Discrete rank grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RankLevel {
    /// Top 1%.
    #[serde(rename = "S")]
    S,
    /// Top 12.5%.
    #[serde(rename = "A+")]
    APlus,
    /// Top 25%.
    #[serde(rename = "A")]
    A,
    /// Top 37.5%.
    #[serde(rename = "A-")]
    AMinus,
    /// Top 50%.
    #[serde(rename = "B+")]
    BPlus,
    /// Top 62.5%.
    #[serde(rename = "B")]
    B,
    /// Top 75%.
    #[serde(rename = "B-")]
    BMinus,
    /// Top 87.5%.
    #[serde(rename = "C+")]
    CPlus,
    /// Everyone else.
    #[serde(rename = "C")]
    C,
}

impl RankLevel {
    /// Returns the label shown on cards (e.g. `"A+"`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
        }
    }

    /// Returns all levels, best first.
    pub fn all() -> &'static [RankLevel] {
        &[
            Self::S,
            Self::APlus,
            Self::A,
            Self::AMinus,
            Self::BPlus,
            Self::B,
            Self::BMinus,
            Self::CPlus,
            Self::C,
        ]
    }
}

impl fmt::Display for RankLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RankLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|level| level.label() == s)
            .ok_or_else(|| CoreError::InvalidData(format!("unknown rank level: {s}")))
    }
}

// ============================================================================
// Rank
// ============================================================================

/// Percentile rank of an account.
///
/// `percentile` is in `[0, 100]` and grows with activity: an account at 80
/// is more active than 80% of the modeled population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rank {
    /// Discrete grade.
    pub level: RankLevel,
    /// Share of the modeled population below this account.
    pub percentile: f64,
}

impl Rank {
    /// Share of the population at or above this account (`100 - percentile`).
    pub fn top_percent(&self) -> f64 {
        100.0 - self.percentile
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self {
            level: RankLevel::C,
            percentile: 0.0,
        }
    }
}

// ============================================================================
// Stats Aggregate
// ============================================================================

/// Aggregated activity totals for one account.
///
/// Field names serialize in camelCase to match what the card renderer reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsAggregate {
    /// Display name (falls back to the login).
    pub name: String,
    /// Commits in the counted window, or all-time when requested.
    pub total_commits: u64,
    /// Pull requests authored.
    #[serde(rename = "totalPRs")]
    pub total_prs: u64,
    /// Merged pull requests (0 unless requested).
    #[serde(rename = "totalPRsMerged")]
    pub total_prs_merged: u64,
    /// `total_prs_merged / total_prs * 100`, 0 without pull requests.
    #[serde(rename = "mergedPRsPercentage")]
    pub merged_prs_percentage: f64,
    /// Open plus closed issues.
    pub total_issues: u64,
    /// Pull request reviews.
    pub total_reviews: u64,
    /// Stars across owned, non-excluded repositories.
    pub total_stars: u64,
    /// Discussions started (0 unless requested).
    pub total_discussions_started: u64,
    /// Discussion answers (0 unless requested).
    pub total_discussions_answered: u64,
    /// Repositories contributed to.
    pub contributed_to: u64,
    /// Rank derived from the totals.
    pub rank: Rank,
}

impl StatsAggregate {
    /// Merged pull request percentage, 0 when there are no pull requests.
    pub fn merged_percentage(merged: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = merged as f64 / total as f64;
        ratio * 100.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_level_order() {
        assert!(RankLevel::S < RankLevel::APlus);
        assert!(RankLevel::CPlus < RankLevel::C);
        assert_eq!(RankLevel::all().len(), 9);
    }

    #[test]
    fn test_rank_level_parse() {
        assert_eq!("A+".parse::<RankLevel>().unwrap(), RankLevel::APlus);
        assert_eq!("B-".parse::<RankLevel>().unwrap(), RankLevel::BMinus);
        assert!("D".parse::<RankLevel>().is_err());
    }

    #[test]
    fn test_rank_top_percent() {
        let rank = Rank {
            level: RankLevel::A,
            percentile: 81.5,
        };
        assert!((rank.top_percent() - 18.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_merged_percentage_without_prs() {
        assert_eq!(StatsAggregate::merged_percentage(10, 0), 0.0);
        assert_eq!(StatsAggregate::merged_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_merged_percentage() {
        assert_eq!(StatsAggregate::merged_percentage(240, 300), 80.0);
    }
}
