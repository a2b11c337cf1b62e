//! Single repository lookup.
//!
//! The owner may be a user or an organization, so both are asked for in
//! one query and whichever resolves is used.

use serde::Deserialize;
use serde_json::json;
use statcard_core::{PrimaryLanguage, RepositoryInfo};
use statcard_fetch::FetchContext;
use tracing::{debug, instrument, warn};

use crate::error::{FetcherError, RepositoryOwner};

/// Repository query for a user or organization owner.
pub const REPO_QUERY: &str = "fragment RepoInfo on Repository {
  name
  nameWithOwner
  isPrivate
  isArchived
  isTemplate
  stargazers {
    totalCount
  }
  description
  primaryLanguage {
    color
    id
    name
  }
  forkCount
}
query getRepo($login: String!, $repo: String!) {
  user(login: $login) {
    repository(name: $repo) {
      ...RepoInfo
    }
  }
  organization(login: $login) {
    repository(name: $repo) {
      ...RepoInfo
    }
  }
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepository {
    name: String,
    #[serde(default)]
    name_with_owner: String,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    is_archived: bool,
    #[serde(default)]
    is_template: bool,
    #[serde(default)]
    stargazers: Stargazers,
    description: Option<String>,
    primary_language: Option<PrimaryLanguage>,
    #[serde(default)]
    fork_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stargazers {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct Owner {
    repository: Option<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RepoData {
    user: Option<Owner>,
    organization: Option<Owner>,
}

impl From<RawRepository> for RepositoryInfo {
    fn from(raw: RawRepository) -> Self {
        Self {
            name: raw.name,
            name_with_owner: raw.name_with_owner,
            is_private: raw.is_private,
            is_archived: raw.is_archived,
            is_template: raw.is_template,
            description: raw.description,
            primary_language: raw.primary_language,
            fork_count: raw.fork_count,
            star_count: raw.stargazers.total_count,
        }
    }
}

/// Fetches a public repository of `owner`.
#[instrument(skip(ctx))]
pub async fn fetch_repo(
    ctx: &FetchContext,
    owner: &str,
    repo: &str,
) -> Result<RepositoryInfo, FetcherError> {
    match (owner.is_empty(), repo.is_empty()) {
        (true, true) => return Err(FetcherError::missing(["username", "repo"])),
        (true, false) => return Err(FetcherError::missing(["username"])),
        (false, true) => return Err(FetcherError::missing(["repo"])),
        (false, false) => {}
    }

    let variables = json!({ "login": owner, "repo": repo });
    let result = ctx.graphql(REPO_QUERY, &variables).await?;

    // A user lookup on an organization login reports NOT_FOUND next to a
    // resolved organization, so errors only matter when there is no data.
    let Some(data) = result.data() else {
        if result.has_errors() {
            return Err(FetcherError::from_api_errors(&result, "Not found"));
        }
        return Err(FetcherError::RepositoryNotFound(RepositoryOwner::Unknown));
    };

    let data: RepoData = serde_json::from_value(data.clone()).map_err(|e| {
        warn!(error = %e, "Malformed repository payload");
        FetcherError::UnexpectedResponse(e.to_string())
    })?;

    let (kind, owner) = match (data.user, data.organization) {
        (None, None) => return Err(FetcherError::RepositoryNotFound(RepositoryOwner::Unknown)),
        (Some(user), None) => (RepositoryOwner::User, user),
        (None, Some(org)) => (RepositoryOwner::Organization, org),
        (Some(_), Some(_)) => {
            return Err(FetcherError::UnexpectedResponse(
                "Both a user and an organization matched".to_string(),
            ));
        }
    };

    match owner.repository {
        Some(repository) if !repository.is_private => {
            debug!(?kind, "Repository found");
            Ok(repository.into())
        }
        _ => Err(FetcherError::RepositoryNotFound(kind)),
    }
}
