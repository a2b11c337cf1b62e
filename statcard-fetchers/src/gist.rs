//! Gist lookup.

use serde::Deserialize;
use serde_json::json;
use statcard_core::GistInfo;
use statcard_fetch::FetchContext;
use tracing::instrument;

use crate::error::FetcherError;

/// Gist query, resolved through the authenticated viewer.
pub const GIST_QUERY: &str = "query gistInfo($gistName: String!) {
  viewer {
    gist(name: $gistName) {
      description
      owner {
        login
      }
      stargazerCount
      forks {
        totalCount
      }
      files {
        name
        language {
          name
        }
        size
      }
    }
  }
}";

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Login {
    login: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Forks {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    name: String,
    language: Option<Named>,
    #[serde(default)]
    size: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGist {
    description: Option<String>,
    owner: Login,
    #[serde(default)]
    stargazer_count: u64,
    #[serde(default)]
    forks: Forks,
    #[serde(default)]
    files: Vec<GistFile>,
}

/// Fetches gist `id`.
#[instrument(skip(ctx))]
pub async fn fetch_gist(ctx: &FetchContext, id: &str) -> Result<GistInfo, FetcherError> {
    if id.is_empty() {
        return Err(FetcherError::missing(["id"]));
    }

    let result = ctx.graphql(GIST_QUERY, &json!({ "gistName": id })).await?;
    if result.has_errors() {
        let message = result
            .first_error()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "Gist not found".to_string());
        return Err(FetcherError::GraphQl(message));
    }

    let gist = result
        .data()
        .and_then(|data| data.pointer("/viewer/gist"))
        .filter(|gist| !gist.is_null())
        .ok_or(FetcherError::GistNotFound)?;
    let gist: RawGist = serde_json::from_value(gist.clone())
        .map_err(|e| FetcherError::UnexpectedResponse(e.to_string()))?;

    let language = primary_language(&gist.files);
    let first = gist
        .files
        .into_iter()
        .next()
        .ok_or_else(|| FetcherError::UnexpectedResponse("Gist has no files".to_string()))?;

    Ok(GistInfo {
        name_with_owner: format!("{}/{}", gist.owner.login, first.name),
        name: first.name,
        description: gist.description,
        language,
        stars_count: gist.stargazer_count,
        forks_count: gist.forks.total_count,
    })
}

/// Language with the largest summed file size; the first seen wins ties.
fn primary_language(files: &[GistFile]) -> Option<String> {
    let mut totals: Vec<(&str, u64)> = Vec::new();
    for file in files {
        let Some(language) = &file.language else {
            continue;
        };
        match totals.iter_mut().find(|entry| entry.0 == language.name) {
            Some((_, size)) => *size += file.size,
            None => totals.push((language.name.as_str(), file.size)),
        }
    }

    totals
        .into_iter()
        .fold(None, |best: Option<(&str, u64)>, (name, size)| match best {
            Some((_, best_size)) if best_size >= size => best,
            _ => Some((name, size)),
        })
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, language: Option<&str>, size: u64) -> GistFile {
        GistFile {
            name: name.to_string(),
            language: language.map(|l| Named { name: l.to_string() }),
            size,
        }
    }

    #[test]
    fn test_primary_language_by_summed_size() {
        let files = vec![
            file("countries.json", Some("JSON"), 85858),
            file("territories.txt", Some("Text"), 87858),
            file("countries_spanish.json", Some("JSON"), 85858),
            file("territories_spanish.txt", Some("Text"), 87858),
        ];
        assert_eq!(primary_language(&files).as_deref(), Some("Text"));
    }

    #[test]
    fn test_primary_language_tie_keeps_first() {
        let files = vec![file("a.rs", Some("Rust"), 10), file("b.go", Some("Go"), 10)];
        assert_eq!(primary_language(&files).as_deref(), Some("Rust"));
    }

    #[test]
    fn test_files_without_language() {
        let files = vec![file("blob", None, 10)];
        assert_eq!(primary_language(&files), None);
    }
}
