//! Serde tests for core types.
//!
//! The card renderer reads these types as JSON, so field names are part of
//! the contract.

use serde_json::json;

use crate::{GistInfo, Rank, RankLevel, RepositoryInfo, StatsAggregate, WakaTimeStats};

// ============================================================================
// Rank Serde Tests
// ============================================================================

#[test]
fn test_rank_level_labels_serialize() {
    for level in RankLevel::all() {
        let json = serde_json::to_string(level).unwrap();
        assert_eq!(json, format!("\"{}\"", level.label()));
    }
}

#[test]
fn test_rank_level_invalid_deserialize() {
    let result: Result<RankLevel, _> = serde_json::from_str(r#""Z""#);
    assert!(result.is_err());
}

#[test]
fn test_rank_serialize_shape() {
    let rank = Rank {
        level: RankLevel::APlus,
        percentile: 90.0,
    };
    assert_eq!(
        serde_json::to_value(rank).unwrap(),
        json!({ "level": "A+", "percentile": 90.0 })
    );
}

// ============================================================================
// StatsAggregate Serde Tests
// ============================================================================

#[test]
fn test_stats_aggregate_field_names() {
    let stats = StatsAggregate {
        name: "Octo Cat".to_string(),
        total_commits: 100,
        total_prs: 300,
        total_prs_merged: 240,
        merged_prs_percentage: 80.0,
        total_issues: 200,
        total_reviews: 50,
        total_stars: 300,
        total_discussions_started: 10,
        total_discussions_answered: 40,
        contributed_to: 61,
        rank: Rank::default(),
    };

    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["name"], "Octo Cat");
    assert_eq!(value["totalCommits"], 100);
    assert_eq!(value["totalPRs"], 300);
    assert_eq!(value["totalPRsMerged"], 240);
    assert_eq!(value["mergedPRsPercentage"], 80.0);
    assert_eq!(value["totalIssues"], 200);
    assert_eq!(value["totalReviews"], 50);
    assert_eq!(value["totalStars"], 300);
    assert_eq!(value["totalDiscussionsStarted"], 10);
    assert_eq!(value["totalDiscussionsAnswered"], 40);
    assert_eq!(value["contributedTo"], 61);
    assert_eq!(value["rank"]["level"], "C");
}

#[test]
fn test_stats_aggregate_default_is_empty() {
    let stats = StatsAggregate::default();
    assert!(stats.name.is_empty());
    assert_eq!(stats.total_stars, 0);
    assert_eq!(stats.rank.level, RankLevel::C);
}

// ============================================================================
// Card Model Serde Tests
// ============================================================================

#[test]
fn test_repository_info_camel_case() {
    let repo = RepositoryInfo {
        name: "convoychat".to_string(),
        name_with_owner: "octocat/convoychat".to_string(),
        is_private: false,
        is_archived: false,
        is_template: false,
        description: None,
        primary_language: None,
        fork_count: 100,
        star_count: 38000,
    };
    let value = serde_json::to_value(&repo).unwrap();
    assert_eq!(value["nameWithOwner"], "octocat/convoychat");
    assert_eq!(value["starCount"], 38000);
    assert_eq!(value["forkCount"], 100);
    assert!(value["primaryLanguage"].is_null());
}

#[test]
fn test_gist_info_camel_case() {
    let gist = GistInfo {
        name: "countries.json".to_string(),
        name_with_owner: "Yizack/countries.json".to_string(),
        description: Some("Countries".to_string()),
        language: Some("Text".to_string()),
        stars_count: 33,
        forks_count: 11,
    };
    let value = serde_json::to_value(&gist).unwrap();
    assert_eq!(value["starsCount"], 33);
    assert_eq!(value["forksCount"], 11);
}

#[test]
fn test_wakatime_ignores_unknown_fields() {
    let stats: WakaTimeStats = serde_json::from_value(json!({
        "username": "anuraghazra",
        "is_coding_activity_visible": true,
        "is_other_usage_visible": true,
        "range": "last_7_days",
        "editors": [{ "name": "VS Code" }],
        "languages": [
            { "name": "TypeScript", "percent": 50.5, "text": "1 hr", "hours": 1, "minutes": 0, "total_seconds": 3600.0, "digital": "1:00" }
        ]
    }))
    .unwrap();

    assert_eq!(stats.username.as_deref(), Some("anuraghazra"));
    assert!(stats.is_coding_activity_visible);
    assert_eq!(stats.languages.len(), 1);
    assert_eq!(stats.languages[0].name, "TypeScript");
}
