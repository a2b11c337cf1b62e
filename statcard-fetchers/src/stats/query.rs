//! GraphQL documents and response shapes for the stats aggregator.

use serde::Deserialize;

/// Repository page selection shared by both queries.
macro_rules! repositories_field {
    () => {
        "repositories(first: 100, ownerAffiliations: OWNER, orderBy: {direction: DESC, field: STARGAZERS}, after: $after) {
      totalCount
      nodes {
        name
        stargazers {
          totalCount
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }"
    };
}

/// Profile totals plus the first repository page.
pub const STATS_QUERY: &str = concat!(
    "query userInfo($login: String!, $after: String, $includeMergedPullRequests: Boolean!, $includeDiscussions: Boolean!, $includeDiscussionsAnswers: Boolean!, $startTime: DateTime = null) {
  user(login: $login) {
    name
    login
    commits: contributionsCollection(from: $startTime) {
      totalCommitContributions
    }
    reviews: contributionsCollection {
      totalPullRequestReviewContributions
    }
    repositoriesContributedTo(first: 1, contributionTypes: [COMMIT, ISSUE, PULL_REQUEST, REPOSITORY]) {
      totalCount
    }
    pullRequests(first: 1) {
      totalCount
    }
    mergedPullRequests: pullRequests(states: MERGED) @include(if: $includeMergedPullRequests) {
      totalCount
    }
    openIssues: issues(states: OPEN) {
      totalCount
    }
    closedIssues: issues(states: CLOSED) {
      totalCount
    }
    followers {
      totalCount
    }
    repositoryDiscussions @include(if: $includeDiscussions) {
      totalCount
    }
    repositoryDiscussionComments(onlyAnswers: true) @include(if: $includeDiscussionsAnswers) {
      totalCount
    }
    ",
    repositories_field!(),
    "
  }
}"
);

/// Stars-only query for repository pages after the first.
pub const REPOS_QUERY: &str = concat!(
    "query userInfo($login: String!, $after: String) {
  user(login: $login) {
    ",
    repositories_field!(),
    "
  }
}"
);

// ============================================================================
// Response Shapes
// ============================================================================

/// `{ totalCount }` connection.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Count {
    pub total_count: u64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommitContributions {
    pub total_commit_contributions: u64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewContributions {
    pub total_pull_request_review_contributions: u64,
}

/// One repository and its star count.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryNode {
    pub name: String,
    #[serde(default)]
    pub stargazers: Count,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of owned repositories.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryPage {
    pub total_count: u64,
    pub nodes: Vec<RepositoryNode>,
    pub page_info: PageInfo,
}

impl RepositoryPage {
    /// Stars of repositories not in `excluded`.
    pub fn stars(&self, excluded: &[String]) -> u64 {
        self.nodes
            .iter()
            .filter(|node| !excluded.iter().any(|name| *name == node.name))
            .map(|node| node.stargazers.total_count)
            .sum()
    }

    /// True when no repository on the page has a star.
    pub fn is_starless(&self) -> bool {
        self.nodes.iter().all(|node| node.stargazers.total_count == 0)
    }
}

/// The `user` object of [`STATS_QUERY`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsUser {
    pub name: Option<String>,
    pub login: Option<String>,
    pub commits: CommitContributions,
    pub reviews: ReviewContributions,
    pub repositories_contributed_to: Count,
    pub pull_requests: Count,
    pub merged_pull_requests: Option<Count>,
    pub open_issues: Count,
    pub closed_issues: Count,
    pub followers: Count,
    pub repository_discussions: Option<Count>,
    pub repository_discussion_comments: Option<Count>,
    pub repositories: RepositoryPage,
}

/// The `user` object of [`REPOS_QUERY`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReposUser {
    pub repositories: RepositoryPage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queries_share_repository_selection() {
        assert!(STATS_QUERY.contains("orderBy: {direction: DESC, field: STARGAZERS}"));
        assert!(REPOS_QUERY.contains("orderBy: {direction: DESC, field: STARGAZERS}"));
        assert!(STATS_QUERY.contains("totalCommitContributions"));
        assert!(!REPOS_QUERY.contains("totalCommitContributions"));
    }

    #[test]
    fn test_page_stars_and_exclusion() {
        let page: RepositoryPage = serde_json::from_value(json!({
            "totalCount": 3,
            "nodes": [
                { "name": "a", "stargazers": { "totalCount": 100 } },
                { "name": "b", "stargazers": { "totalCount": 50 } },
                { "name": "c", "stargazers": { "totalCount": 0 } }
            ],
            "pageInfo": { "hasNextPage": true, "endCursor": "xyz" }
        }))
        .unwrap();

        assert_eq!(page.stars(&[]), 150);
        assert_eq!(page.stars(&["a".to_string()]), 50);
        assert!(!page.is_starless());
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_empty_page_is_starless() {
        assert!(RepositoryPage::default().is_starless());
    }
}
