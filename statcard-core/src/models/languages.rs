//! Top language aggregation.

use serde::{Deserialize, Serialize};

/// A language aggregated over an account's repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Language name.
    pub name: String,
    /// Hex color.
    pub color: Option<String>,
    /// Ranking score, `bytes^size_weight * repos^count_weight`.
    pub size: f64,
    /// Number of repositories using the language.
    pub count: u64,
}

/// Languages sorted by score, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopLanguages {
    languages: Vec<Language>,
}

impl TopLanguages {
    /// Builds the list, sorting by score descending.
    ///
    /// Ties keep their input order.
    pub fn new(mut languages: Vec<Language>) -> Self {
        languages.sort_by(|a, b| b.size.total_cmp(&a.size));
        Self { languages }
    }

    /// Returns the languages, highest score first.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// Looks up a language by name.
    pub fn get(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.name == name)
    }

    /// Keeps only the first `n` languages.
    pub fn truncate(&mut self, n: usize) {
        self.languages.truncate(n);
    }

    /// Number of languages.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Returns true if no language was found.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Sum of all scores.
    pub fn total_size(&self) -> f64 {
        self.languages.iter().map(|l| l.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(name: &str, size: f64) -> Language {
        Language {
            name: name.to_string(),
            color: None,
            size,
            count: 1,
        }
    }

    #[test]
    fn test_sorted_by_size() {
        let top = TopLanguages::new(vec![lang("Go", 10.0), lang("Rust", 30.0), lang("C", 20.0)]);
        let names: Vec<_> = top.languages().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "C", "Go"]);
        assert_eq!(top.total_size(), 60.0);
    }

    #[test]
    fn test_truncate() {
        let mut top = TopLanguages::new(vec![lang("Go", 10.0), lang("Rust", 30.0)]);
        top.truncate(1);
        assert_eq!(top.len(), 1);
        assert!(top.get("Rust").is_some());
        assert!(top.get("Go").is_none());
    }
}
