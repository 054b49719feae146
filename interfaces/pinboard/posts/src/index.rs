use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

pub const RESULT_DONE: &str = "done";

pub struct PinboardResult {
    pub body: String,
    pub status: StatusCode,
}

#[derive(Debug, Deserialize)]
pub struct RecentPostsResponse {
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub struct Post {
    pub href: String,
    /// Pinboard calls the bookmark title `description`.
    pub description: String,
    #[serde(default)]
    pub extended: String,
    #[serde(default)]
    pub tags: String,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AddPostResponse {
    pub result_code: String,
}

impl AddPostResponse {
    pub fn is_done(&self) -> bool {
        self.result_code.eq_ignore_ascii_case(RESULT_DONE)
    }
}

/// A bookmark as `posts/add` expects it.
pub struct NewPost<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub extended: &'a str,
    pub tags: &'a [String],
}

pub async fn fetch_recent_posts(
    client: &Client,
    api_url: &str,
    token: &str,
    tag: &str,
    count: u32,
) -> Result<PinboardResult, FetchRecentPostsError> {
    let url = format!("{}/posts/recent", api_url.trim_end_matches('/'));
    let count = count.to_string();

    let response = client
        .get(&url)
        .query(&[
            ("tag", tag),
            ("count", count.as_str()),
            ("format", "json"),
            ("auth_token", token),
        ])
        .send()
        .await
        .map_err(|source| FetchRecentPostsError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| FetchRecentPostsError::ResponseRead { source })?;

    Ok(PinboardResult { body, status })
}

/// Creates a bookmark. Sent with `replace=no`, so an existing bookmark for
/// the same URL is left alone and reported through `result_code`.
pub async fn add_post(
    client: &Client,
    api_url: &str,
    token: &str,
    post: &NewPost<'_>,
) -> Result<PinboardResult, AddPostError> {
    let url = format!("{}/posts/add", api_url.trim_end_matches('/'));
    let tags = post.tags.join(" ");

    let response = client
        .get(&url)
        .query(&[
            ("url", post.url),
            ("description", post.title),
            ("extended", post.extended),
            ("tags", tags.as_str()),
            ("replace", "no"),
            ("format", "json"),
            ("auth_token", token),
        ])
        .send()
        .await
        .map_err(|source| AddPostError::RequestSend { source })?;

    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|source| AddPostError::ResponseRead { source })?;

    Ok(PinboardResult { body, status })
}

#[derive(Debug, Error)]
pub enum FetchRecentPostsError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum AddPostError {
    #[error("RequestSend: {source}")]
    RequestSend {
        source: reqwest::Error,
    },

    #[error("ResponseRead: {source}")]
    ResponseRead {
        source: reqwest::Error,
    },
}
