//! Paginated stats aggregation.
//!
//! One aggregation run issues the profile query, then optionally walks the
//! owner's repositories (sorted by stars, descending) and optionally asks
//! the commit search API for the all-time commit count. Pages are fetched
//! strictly in cursor order; a page in which no repository has a star ends
//! the walk early.

use chrono::{SecondsFormat, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use statcard_core::{RankInput, StatsAggregate, calculate_rank};
use statcard_fetch::{FetchContext, FetchResult};
use tracing::{debug, info, instrument, warn};

use super::commits::{fetch_total_commits, validate_username};
use super::query::{Count, REPOS_QUERY, RepositoryPage, ReposUser, STATS_QUERY, StatsUser};
use crate::error::{FetcherError, USER_NOT_FOUND_MESSAGE};

// ============================================================================
// Request
// ============================================================================

/// Parameters of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsRequest {
    /// Account login.
    pub login: String,
    /// Count all-time commits through the commit search API.
    pub include_all_commits: bool,
    /// Repositories whose stars are not counted, in addition to the
    /// globally excluded ones.
    pub excluded_repositories: Vec<String>,
    /// Fetch the merged pull request count.
    pub include_merged_pull_requests: bool,
    /// Fetch the number of discussions started.
    pub include_discussions: bool,
    /// Fetch the number of discussion answers.
    pub include_discussions_answers: bool,
    /// Count commits from January 1st of this year instead of the default
    /// contribution window.
    pub commits_year: Option<i32>,
}

impl StatsRequest {
    /// Creates a request for `login` with every option off.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Default::default()
        }
    }

    /// Counts all-time commits.
    pub fn all_commits(mut self, enabled: bool) -> Self {
        self.include_all_commits = enabled;
        self
    }

    /// Excludes repositories from the star count.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_repositories
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Fetches the merged pull request count.
    pub fn merged_pull_requests(mut self, enabled: bool) -> Self {
        self.include_merged_pull_requests = enabled;
        self
    }

    /// Fetches the discussions started count.
    pub fn discussions(mut self, enabled: bool) -> Self {
        self.include_discussions = enabled;
        self
    }

    /// Fetches the discussion answers count.
    pub fn discussions_answers(mut self, enabled: bool) -> Self {
        self.include_discussions_answers = enabled;
        self
    }

    /// Counts commits of `year` only.
    pub fn commits_year(mut self, year: i32) -> Self {
        self.commits_year = Some(year);
        self
    }

    /// `startTime` of the commit contribution window, January 1st UTC.
    fn start_time(&self) -> Option<String> {
        let year = self.commits_year?;
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .map(|start| start.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Aggregates account stats over a [`FetchContext`].
#[derive(Debug, Clone, Copy)]
pub struct StatsAggregator<'a> {
    ctx: &'a FetchContext,
}

impl<'a> StatsAggregator<'a> {
    /// Creates an aggregator.
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }

    /// Runs one aggregation.
    ///
    /// Either every request succeeds and a complete aggregate is returned,
    /// or the first failure is returned; partial aggregates are never
    /// produced.
    #[instrument(skip(self, request), fields(login = %request.login))]
    pub async fn aggregate(&self, request: &StatsRequest) -> Result<StatsAggregate, FetcherError> {
        if request.login.is_empty() {
            return Err(FetcherError::missing(["username"]));
        }
        if request.include_all_commits {
            validate_username(&request.login)?;
        }

        let user = self.fetch_profile(request).await?;
        let excluded = self.excluded(request);
        let total_stars = self.count_stars(&request.login, &user.repositories, &excluded).await?;

        let total_commits = if request.include_all_commits {
            fetch_total_commits(self.ctx, &request.login).await?
        } else {
            user.commits.total_commit_contributions
        };

        let total_prs = user.pull_requests.total_count;
        let total_prs_merged =
            optional_count(request.include_merged_pull_requests, user.merged_pull_requests);
        let total_issues = user.open_issues.total_count + user.closed_issues.total_count;
        let total_reviews = user.reviews.total_pull_request_review_contributions;

        let rank = calculate_rank(&RankInput {
            all_commits: request.include_all_commits,
            commits: total_commits,
            prs: total_prs,
            issues: total_issues,
            reviews: total_reviews,
            repos: user.repositories.total_count,
            stars: total_stars,
            followers: user.followers.total_count,
        });

        let stats = StatsAggregate {
            name: user
                .name
                .or(user.login)
                .unwrap_or_else(|| request.login.clone()),
            total_commits,
            total_prs,
            total_prs_merged,
            merged_prs_percentage: StatsAggregate::merged_percentage(total_prs_merged, total_prs),
            total_issues,
            total_reviews,
            total_stars,
            total_discussions_started: optional_count(
                request.include_discussions,
                user.repository_discussions,
            ),
            total_discussions_answered: optional_count(
                request.include_discussions_answers,
                user.repository_discussion_comments,
            ),
            contributed_to: user.repositories_contributed_to.total_count,
            rank,
        };

        info!(level = %stats.rank.level, "Aggregated stats");
        Ok(stats)
    }

    async fn fetch_profile(&self, request: &StatsRequest) -> Result<StatsUser, FetcherError> {
        let variables = json!({
            "login": request.login,
            "after": Value::Null,
            "includeMergedPullRequests": request.include_merged_pull_requests,
            "includeDiscussions": request.include_discussions,
            "includeDiscussionsAnswers": request.include_discussions_answers,
            "startTime": request.start_time(),
        });

        let result = self.ctx.graphql(STATS_QUERY, &variables).await?;
        parse_user(&result)
    }

    async fn fetch_page(&self, login: &str, cursor: &str) -> Result<RepositoryPage, FetcherError> {
        let variables = json!({ "login": login, "after": cursor });
        let result = self.ctx.graphql(REPOS_QUERY, &variables).await?;
        parse_user::<ReposUser>(&result).map(|user| user.repositories)
    }

    /// Sums stars over the first page and, when enabled, the pages after it.
    async fn count_stars(
        &self,
        login: &str,
        first: &RepositoryPage,
        excluded: &[String],
    ) -> Result<u64, FetcherError> {
        let mut total = first.stars(excluded);
        if !self.ctx.settings().fetch_multi_page_stars {
            return Ok(total);
        }

        let mut page_info = first.page_info.clone();
        let mut starless = first.is_starless();
        let mut pages = 1usize;

        while page_info.has_next_page && !starless {
            let Some(cursor) = page_info.end_cursor.take() else {
                warn!("Next page reported without a cursor");
                break;
            };

            let page = self.fetch_page(login, &cursor).await?;
            pages += 1;
            total += page.stars(excluded);
            starless = page.is_starless();

            if page.page_info.end_cursor.as_deref() == Some(cursor.as_str()) {
                warn!(cursor, "Repository cursor did not advance");
                break;
            }
            page_info = page.page_info;
        }

        debug!(pages, total, starless, "Counted stars");
        Ok(total)
    }

    fn excluded(&self, request: &StatsRequest) -> Vec<String> {
        request
            .excluded_repositories
            .iter()
            .chain(&self.ctx.settings().excluded_repositories)
            .cloned()
            .collect()
    }
}

/// Aggregates stats for `request`.
pub async fn fetch_stats(
    ctx: &FetchContext,
    request: &StatsRequest,
) -> Result<StatsAggregate, FetcherError> {
    StatsAggregator::new(ctx).aggregate(request).await
}

fn optional_count(requested: bool, count: Option<Count>) -> u64 {
    if requested {
        count.map_or(0, |c| c.total_count)
    } else {
        0
    }
}

fn parse_user<T: DeserializeOwned>(result: &FetchResult) -> Result<T, FetcherError> {
    if !result.is_success_status() {
        let message = result.message.as_deref().unwrap_or("no message");
        warn!(status = result.status, message, "Profile query failed upstream");
        return Err(FetcherError::UnexpectedResponse(format!(
            "HTTP {}: {message}",
            result.status
        )));
    }

    if result.has_errors() {
        return Err(FetcherError::from_api_errors(result, USER_NOT_FOUND_MESSAGE));
    }

    let user = result
        .data()
        .and_then(|data| data.get("user"))
        .filter(|user| !user.is_null())
        .ok_or_else(|| FetcherError::UserNotFound(USER_NOT_FOUND_MESSAGE.to_string()))?;

    serde_json::from_value(user.clone()).map_err(|e| {
        warn!(error = %e, "Malformed user payload");
        FetcherError::UnexpectedResponse(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = StatsRequest::new("octocat")
            .all_commits(true)
            .exclude(["a", "b"])
            .merged_pull_requests(true)
            .discussions(true)
            .discussions_answers(true)
            .commits_year(2003);

        assert!(request.include_all_commits);
        assert_eq!(request.excluded_repositories, vec!["a", "b"]);
        assert_eq!(request.start_time().as_deref(), Some("2003-01-01T00:00:00Z"));
    }

    #[test]
    fn test_no_year_has_no_start_time() {
        assert_eq!(StatsRequest::new("octocat").start_time(), None);
    }

    #[test]
    fn test_optional_counts_only_when_requested() {
        let count = Some(Count { total_count: 7 });
        assert_eq!(optional_count(true, count), 7);
        assert_eq!(optional_count(false, count), 0);
        assert_eq!(optional_count(true, None), 0);
    }
}
