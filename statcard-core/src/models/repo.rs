//! Repository and gist card data.

use serde::{Deserialize, Serialize};

/// Primary language of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryLanguage {
    /// Language name.
    pub name: String,
    /// Hex color, absent for languages without one.
    #[serde(default)]
    pub color: Option<String>,
    /// Upstream node id.
    #[serde(default)]
    pub id: Option<String>,
}

/// A single public repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    /// Repository name.
    pub name: String,
    /// `owner/name`.
    pub name_with_owner: String,
    /// Whether the repository is private.
    pub is_private: bool,
    /// Whether the repository is archived.
    pub is_archived: bool,
    /// Whether the repository is a template.
    pub is_template: bool,
    /// Description.
    pub description: Option<String>,
    /// Primary language.
    pub primary_language: Option<PrimaryLanguage>,
    /// Number of forks.
    pub fork_count: u64,
    /// Number of stargazers.
    pub star_count: u64,
}

/// A single gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GistInfo {
    /// Name of the gist's first file.
    pub name: String,
    /// `owner/first-file`.
    pub name_with_owner: String,
    /// Description.
    pub description: Option<String>,
    /// Language with the largest summed file size.
    pub language: Option<String>,
    /// Stargazers.
    pub stars_count: u64,
    /// Forks.
    pub forks_count: u64,
}
