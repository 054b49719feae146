use chrono::{DateTime, Utc};
use reqwest::{
    header::{HeaderMap, ACCEPT, LINK},
    Client, StatusCode,
};
use serde::Deserialize;
use thiserror::Error;

/// Media type that makes GitHub include `starred_at` in each listing item.
pub const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
pub const API_VERSION: &str = "2022-11-28";
pub const PER_PAGE: u32 = 100;

pub struct GitHubStarredResult {
    pub body: String,
    pub status: StatusCode,
    pub next_url: Option<String>,
    pub rate_limit: RateLimit,
}

/// Quota headers returned with every REST response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: Option<u64>,
    /// Unix timestamp at which the window resets.
    pub reset: Option<i64>,
}

impl RateLimit {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let remaining = headers
            .get("X-RateLimit-Remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let reset = headers
            .get("X-RateLimit-Reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());

        Self { remaining, reset }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

#[derive(Debug, Deserialize)]
pub struct StarredEntry {
    pub starred_at: DateTime<Utc>,
    pub repo: StarredRepo,
}

#[derive(Debug, Deserialize)]
pub struct StarredRepo {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// URL of the first page, newest stars first.
pub fn starred_url(api_url: &str, user: &str) -> String {
    format!(
        "{}/users/{user}/starred?sort=created&direction=desc&per_page={PER_PAGE}",
        api_url.trim_end_matches('/')
    )
}

pub async fn fetch_starred_page(
    client: &Client,
    url: &str,
    token: Option<&str>,
) -> Result<GitHubStarredResult, FetchStarredPageError> {
    let mut request = client
        .get(url)
        .header(ACCEPT, STAR_MEDIA_TYPE)
        .header("X-GitHub-Api-Version", API_VERSION);

    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|source| FetchStarredPageError::RequestSend { source })?;

    let status = response.status();
    let next_url = next_link(response.headers());
    let rate_limit = RateLimit::from_headers(response.headers());

    let body = response
        .text()
        .await
        .map_err(|source| FetchStarredPageError::ResponseRead { source })?;

    Ok(GitHubStarredResult {
        body,
        status,
        next_url,
        rate_limit,
    })
}

/// Extracts the `rel="next"` target from a `Link` header, if any.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(parse_next_link)
}

fn parse_next_link(link: &str) -> Option<String> {
    let mut parts = link.split(';');
    let url = parts
        .next()?
        .trim()
        .strip_prefix('<')?
        .strip_suffix('>')?;

    let is_next = parts.any(|param| {
        let param = param.trim();
        param == r#"rel="next""# || param == "rel=next"
    });

    is_next.then(|| url.to_string())
}

#[derive(Debug, Error)]
pub enum FetchStarredPageError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}
