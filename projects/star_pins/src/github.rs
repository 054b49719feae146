use interfaces_github_starred::index::{
    fetch_starred_page, starred_url, GitHubStarredResult, StarredEntry,
};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::GitHubConfig;
use crate::models::star::StarredRepository;
use crate::response::excerpt;
use crate::stages::list_stars::index::{paginate, ListStarsError, StarPage, StarSource, StarStream};

pub struct GitHubStars {
    client: Client,
    config: GitHubConfig,
}

impl GitHubStars {
    pub fn new(client: Client, config: GitHubConfig) -> Self {
        Self { client, config }
    }
}

impl StarSource for GitHubStars {
    fn starred(&self) -> StarStream<'_> {
        let first = starred_url(&self.config.api_url, &self.config.user);

        paginate(first, move |url| async move {
            let result = fetch_starred_page(&self.client, &url, self.config.token.as_deref())
                .await
                .map_err(|source| ListStarsError::Network { source })?;

            read_starred_page(result, &self.config.user)
        })
    }
}

/// Turns one raw listing response into a page or a classified error.
pub fn read_starred_page(
    result: GitHubStarredResult,
    user: &str,
) -> Result<StarPage, ListStarsError> {
    let GitHubStarredResult {
        body,
        status,
        next_url,
        rate_limit,
    } = result;

    debug!(%status, remaining = ?rate_limit.remaining, "GitHub starred page");

    match status {
        StatusCode::OK => {
            let entries: Vec<StarredEntry> = serde_json::from_str(&body)
                .map_err(|source| ListStarsError::Decode { source })?;

            Ok(StarPage {
                repos: entries.into_iter().map(StarredRepository::from).collect(),
                next: next_url,
            })
        }
        StatusCode::UNAUTHORIZED => Err(ListStarsError::Authentication { status }),
        StatusCode::TOO_MANY_REQUESTS => Err(ListStarsError::RateLimited {
            reset_at: rate_limit.reset_at(),
        }),
        StatusCode::FORBIDDEN if rate_limit.is_exhausted() => Err(ListStarsError::RateLimited {
            reset_at: rate_limit.reset_at(),
        }),
        StatusCode::NOT_FOUND => Err(ListStarsError::UnknownUser {
            user: user.to_string(),
        }),
        _ => Err(ListStarsError::UnexpectedStatus {
            status,
            body: excerpt(&body),
        }),
    }
}
