use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::models::star::StarredRepository;

/// Tag carried by every bookmark this tool creates.
pub const MARKER_TAG: &str = "github-star";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Always contains [`MARKER_TAG`].
    pub tags: BTreeSet<String>,
    /// Assigned by the bookmarking service, `None` until stored.
    pub created_at: Option<DateTime<Utc>>,
}

impl Bookmark {
    pub fn from_star(repo: &StarredRepository) -> Self {
        Self {
            url: repo.url.clone(),
            title: repo.full_name.clone(),
            description: describe(repo),
            tags: bookmark_tags(repo.language.as_deref()),
            created_at: None,
        }
    }

    /// Tags in submission order, marker first.
    pub fn tag_list(&self) -> Vec<String> {
        let mut tags = vec![MARKER_TAG.to_string()];
        tags.extend(self.tags.iter().filter(|t| *t != MARKER_TAG).cloned());
        tags
    }
}

pub fn bookmark_tags(language: Option<&str>) -> BTreeSet<String> {
    let mut tags = BTreeSet::from([MARKER_TAG.to_string()]);
    if let Some(tag) = language.and_then(language_tag) {
        tags.insert(tag);
    }
    tags
}

/// Pinboard splits tags on whitespace, so multi-word languages are joined
/// with `-` ("Vim Script" becomes "Vim-Script"). Case is kept.
pub fn language_tag(language: &str) -> Option<String> {
    let words: Vec<&str> = language.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    Some(words.join("-"))
}

fn describe(repo: &StarredRepository) -> String {
    let mut description = repo.description.clone().unwrap_or_default();

    if let Some(homepage) = repo.homepage.as_deref().map(str::trim) {
        if !homepage.is_empty() {
            description.push_str(&format!("\n\nProject homepage: {homepage}"));
        }
    }

    description
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(language: Option<&str>, homepage: Option<&str>) -> StarredRepository {
        StarredRepository {
            full_name: "tokio-rs/tokio".to_string(),
            url: "https://github.com/tokio-rs/tokio".to_string(),
            description: Some("A runtime for asynchronous Rust".to_string()),
            homepage: homepage.map(str::to_string),
            starred_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            language: language.map(str::to_string),
        }
    }

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn language_becomes_second_tag() {
        let bookmark = Bookmark::from_star(&repo(Some("Rust"), None));
        assert_eq!(bookmark.tags, set(&["github-star", "Rust"]));
        assert_eq!(bookmark.tag_list(), vec!["github-star", "Rust"]);
    }

    #[test]
    fn no_language_only_marker() {
        let bookmark = Bookmark::from_star(&repo(None, None));
        assert_eq!(bookmark.tags, set(&["github-star"]));
        assert_eq!(bookmark.tag_list(), vec!["github-star"]);
    }

    #[test]
    fn blank_language_ignored() {
        assert_eq!(bookmark_tags(Some("   ")), set(&["github-star"]));
    }

    #[test]
    fn multi_word_language_joined() {
        assert_eq!(
            bookmark_tags(Some("Vim Script")),
            set(&["github-star", "Vim-Script"])
        );
    }

    #[test]
    fn title_and_url_come_from_repo() {
        let bookmark = Bookmark::from_star(&repo(Some("Rust"), None));
        assert_eq!(bookmark.title, "tokio-rs/tokio");
        assert_eq!(bookmark.url, "https://github.com/tokio-rs/tokio");
        assert_eq!(bookmark.description, "A runtime for asynchronous Rust");
        assert!(bookmark.created_at.is_none());
    }

    #[test]
    fn homepage_appended_to_description() {
        let bookmark = Bookmark::from_star(&repo(None, Some("https://tokio.rs")));
        assert_eq!(
            bookmark.description,
            "A runtime for asynchronous Rust\n\nProject homepage: https://tokio.rs"
        );

        let blank = Bookmark::from_star(&repo(None, Some("")));
        assert_eq!(blank.description, "A runtime for asynchronous Rust");
    }
}
