use chrono::{DateTime, Utc};
use interfaces_github_starred::index::StarredEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarredRepository {
    /// `owner/name`
    pub full_name: String,
    pub url: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub starred_at: DateTime<Utc>,
    pub language: Option<String>,
}

impl From<StarredEntry> for StarredRepository {
    fn from(entry: StarredEntry) -> Self {
        let StarredEntry { starred_at, repo } = entry;

        Self {
            full_name: repo.full_name,
            url: repo.html_url,
            description: repo.description,
            homepage: repo.homepage,
            starred_at,
            language: repo.language,
        }
    }
}
