//! WakaTime coding stats.
//!
//! Only the fields the cards read are typed; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A language entry in WakaTime stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WakaTimeLanguage {
    /// Language name.
    pub name: String,
    /// Share of total time.
    pub percent: f64,
    /// Human-readable duration (e.g. "2 hrs 5 mins").
    pub text: String,
    /// Whole hours.
    pub hours: u64,
    /// Remaining minutes.
    pub minutes: u64,
    /// Total seconds.
    pub total_seconds: f64,
}

/// WakaTime stats for a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WakaTimeStats {
    /// WakaTime username.
    pub username: Option<String>,
    /// Stats range (e.g. "last_7_days").
    pub range: Option<String>,
    /// Whether coding activity is public.
    pub is_coding_activity_visible: bool,
    /// Whether other usage is public.
    pub is_other_usage_visible: bool,
    /// Human-readable total.
    pub human_readable_total: Option<String>,
    /// Human-readable total including other languages.
    pub human_readable_total_including_other_language: Option<String>,
    /// Per-language breakdown.
    pub languages: Vec<WakaTimeLanguage>,
}
