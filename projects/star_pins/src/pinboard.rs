use async_trait::async_trait;
use interfaces_pinboard_posts::index::{
    add_post, fetch_recent_posts, AddPostResponse, NewPost, PinboardResult, RecentPostsResponse,
};
use reqwest::{Client, StatusCode};

use crate::config::PinboardConfig;
use crate::models::bookmark::Bookmark;
use crate::response::excerpt;
use crate::stages::check_recency::index::{CheckRecencyError, Cutoff, RecentBookmarks};
use crate::stages::write_bookmarks::index::{BookmarkSink, WriteError};

pub struct PinboardBookmarks {
    client: Client,
    config: PinboardConfig,
}

impl PinboardBookmarks {
    pub fn new(client: Client, config: PinboardConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl RecentBookmarks for PinboardBookmarks {
    async fn latest_tagged(&self, tag: &str) -> Result<Cutoff, CheckRecencyError> {
        let result = fetch_recent_posts(&self.client, &self.config.api_url, &self.config.token, tag, 1)
            .await
            .map_err(|source| CheckRecencyError::Network { source })?;

        read_recent_posts(result)
    }
}

#[async_trait]
impl BookmarkSink for PinboardBookmarks {
    async fn add(&self, bookmark: &Bookmark) -> Result<(), WriteError> {
        let tags = bookmark.tag_list();
        let post = NewPost {
            url: &bookmark.url,
            title: &bookmark.title,
            extended: &bookmark.description,
            tags: &tags,
        };

        let result = add_post(&self.client, &self.config.api_url, &self.config.token, &post)
            .await
            .map_err(|source| WriteError::Network { source })?;

        read_add_post(result)
    }
}

pub fn read_recent_posts(result: PinboardResult) -> Result<Cutoff, CheckRecencyError> {
    let PinboardResult { body, status } = result;

    match status {
        StatusCode::OK => {
            let parsed: RecentPostsResponse = serde_json::from_str(&body)
                .map_err(|source| CheckRecencyError::Decode { source })?;

            Ok(parsed.posts.iter().map(|post| post.time).max())
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(CheckRecencyError::Authentication { status })
        }
        StatusCode::TOO_MANY_REQUESTS => Err(CheckRecencyError::RateLimited),
        _ => Err(CheckRecencyError::UnexpectedStatus {
            status,
            body: excerpt(&body),
        }),
    }
}

pub fn read_add_post(result: PinboardResult) -> Result<(), WriteError> {
    let PinboardResult { body, status } = result;

    match status {
        StatusCode::OK => {
            let parsed: AddPostResponse =
                serde_json::from_str(&body).map_err(|source| WriteError::Decode { source })?;

            if parsed.is_done() {
                Ok(())
            } else {
                Err(WriteError::Rejected {
                    result_code: parsed.result_code,
                })
            }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(WriteError::Authentication { status }),
        StatusCode::TOO_MANY_REQUESTS => Err(WriteError::RateLimited),
        _ => Err(WriteError::UnexpectedStatus {
            status,
            body: excerpt(&body),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: StatusCode, body: &str) -> PinboardResult {
        PinboardResult {
            body: body.to_string(),
            status,
        }
    }

    #[test]
    fn recent_post_time_is_cutoff() {
        let body = r#"{"date":"2024-05-02T08:00:00Z","user":"someone","posts":[
            {"href":"https://github.com/a/b","description":"a/b","extended":"","tags":"github-star Go","time":"2024-05-01T10:30:00Z"}
        ]}"#;

        let cutoff = read_recent_posts(result(StatusCode::OK, body)).unwrap();
        assert_eq!(cutoff.map(|t| t.to_rfc3339()), Some("2024-05-01T10:30:00+00:00".to_string()));
    }

    #[test]
    fn no_recent_posts_is_no_cutoff() {
        let body = r#"{"date":"2024-05-02T08:00:00Z","user":"someone","posts":[]}"#;
        assert_eq!(read_recent_posts(result(StatusCode::OK, body)).unwrap(), None);
    }

    #[test]
    fn recent_with_bad_token_is_authentication() {
        let err = read_recent_posts(result(StatusCode::UNAUTHORIZED, "401 Forbidden")).unwrap_err();
        assert!(matches!(err, CheckRecencyError::Authentication { .. }));
        assert!(err.to_string().starts_with("Pinboard rejected the API token"));
    }

    #[test]
    fn recent_rate_limited() {
        let err = read_recent_posts(result(StatusCode::TOO_MANY_REQUESTS, "")).unwrap_err();
        assert!(matches!(err, CheckRecencyError::RateLimited));
    }

    #[test]
    fn add_done_is_ok() {
        assert!(read_add_post(result(StatusCode::OK, r#"{"result_code":"done"}"#)).is_ok());
    }

    #[test]
    fn add_existing_item_is_rejected() {
        let err = read_add_post(result(StatusCode::OK, r#"{"result_code":"item already exists"}"#))
            .unwrap_err();
        match err {
            WriteError::Rejected { result_code } => assert_eq!(result_code, "item already exists"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn add_with_bad_token_is_fatal() {
        let err = read_add_post(result(StatusCode::UNAUTHORIZED, "")).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn add_rate_limited_is_skippable() {
        let err = read_add_post(result(StatusCode::TOO_MANY_REQUESTS, "")).unwrap_err();
        assert!(matches!(err, WriteError::RateLimited));
        assert!(!err.is_fatal());
    }

    #[test]
    fn add_server_error_keeps_excerpt() {
        let err = read_add_post(result(StatusCode::BAD_GATEWAY, "upstream down")).unwrap_err();
        assert_eq!(err.to_string(), "Pinboard answered HTTP 502 Bad Gateway: upstream down");
    }
}
