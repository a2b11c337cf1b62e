//! Top languages across an account's own repositories.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;
use statcard_core::{Language, TopLanguages};
use statcard_fetch::FetchContext;
use tracing::{debug, instrument};

use crate::error::FetcherError;

/// Languages of the first 100 owned, non-fork repositories.
pub const TOP_LANGUAGES_QUERY: &str = "query userInfo($login: String!) {
  user(login: $login) {
    repositories(ownerAffiliations: OWNER, isFork: false, first: 100) {
      nodes {
        name
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              color
              name
            }
          }
        }
      }
    }
  }
}";

const LANGUAGES_ERROR: &str =
    "Something went wrong while trying to retrieve the language data using the GraphQL API.";

/// Weights of the ranking score `bytes^size_weight * repos^count_weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanguageWeights {
    /// Exponent applied to the summed byte size.
    pub size_weight: f64,
    /// Exponent applied to the number of repositories.
    pub count_weight: f64,
}

impl Default for LanguageWeights {
    fn default() -> Self {
        Self {
            size_weight: 1.0,
            count_weight: 0.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LanguageNode {
    name: String,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LanguageEdge {
    size: u64,
    node: LanguageNode,
}

#[derive(Debug, Default, Deserialize)]
struct Languages {
    #[serde(default)]
    edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize)]
struct RepoNode {
    #[serde(default)]
    name: String,
    #[serde(default)]
    languages: Languages,
}

#[derive(Debug, Deserialize)]
struct Repositories {
    #[serde(default)]
    nodes: Vec<RepoNode>,
}

#[derive(Debug, Deserialize)]
struct LanguagesUser {
    repositories: Repositories,
}

/// Fetches and ranks the languages of `login`.
#[instrument(skip(ctx, excluded))]
pub async fn fetch_top_languages(
    ctx: &FetchContext,
    login: &str,
    excluded: &[String],
    weights: LanguageWeights,
) -> Result<TopLanguages, FetcherError> {
    if login.is_empty() {
        return Err(FetcherError::missing(["username"]));
    }

    let result = ctx
        .graphql(TOP_LANGUAGES_QUERY, &json!({ "login": login }))
        .await?;

    if result.has_errors() {
        return Err(FetcherError::from_api_errors(&result, LANGUAGES_ERROR));
    }

    let user = result
        .data()
        .and_then(|data| data.get("user"))
        .filter(|user| !user.is_null())
        .ok_or_else(|| FetcherError::GraphQl(LANGUAGES_ERROR.to_string()))?;
    let user: LanguagesUser = serde_json::from_value(user.clone())
        .map_err(|e| FetcherError::UnexpectedResponse(e.to_string()))?;

    let top = rank_languages(&user.repositories.nodes, excluded, weights);
    debug!(languages = top.len(), "Ranked languages");
    Ok(top)
}

fn rank_languages(repos: &[RepoNode], excluded: &[String], weights: LanguageWeights) -> TopLanguages {
    // Insertion order is kept so equal scores rank in first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (Option<String>, u64, u64)> = HashMap::new();

    let edges = repos
        .iter()
        .filter(|repo| !excluded.contains(&repo.name))
        .flat_map(|repo| &repo.languages.edges);

    for edge in edges {
        let entry = totals.entry(edge.node.name.clone()).or_insert_with(|| {
            order.push(edge.node.name.clone());
            (edge.node.color.clone(), 0, 0)
        });
        entry.1 += edge.size;
        entry.2 += 1;
    }

    let languages = order
        .into_iter()
        .filter_map(|name| {
            let (color, size, count) = totals.remove(&name)?;
            Some(Language {
                size: score(size, count, weights),
                name,
                color,
                count,
            })
        })
        .collect();

    TopLanguages::new(languages)
}

#[allow(clippy::cast_precision_loss)]
fn score(size: u64, count: u64, weights: LanguageWeights) -> f64 {
    (size as f64).powf(weights.size_weight) * (count as f64).powf(weights.count_weight)
}
