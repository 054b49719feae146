use std::future::Future;

use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use interfaces_github_starred::index::FetchStarredPageError;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::models::star::StarredRepository;

pub type StarStream<'a> = BoxStream<'a, Result<StarredRepository, ListStarsError>>;

/// Source of a user's starred repositories.
pub trait StarSource {
    /// Newest star first. Nothing is fetched until the stream is polled, and
    /// the stream cannot be rewound; call again to start over.
    fn starred(&self) -> StarStream<'_>;
}

/// One page of the listing plus the address of the following page.
#[derive(Debug, Default)]
pub struct StarPage {
    pub repos: Vec<StarredRepository>,
    pub next: Option<String>,
}

/// Flattens a paged listing into a lazy stream of repositories.
///
/// `fetch` is called with `first`, then with each page's `next` until a page
/// has no successor or comes back empty. An error ends the stream.
pub fn paginate<'a, F, Fut>(first: String, fetch: F) -> StarStream<'a>
where
    F: FnMut(String) -> Fut + Send + 'a,
    Fut: Future<Output = Result<StarPage, ListStarsError>> + Send + 'a,
{
    stream::try_unfold((Some(first), fetch), |(next, mut fetch)| async move {
        let Some(url) = next else {
            return Ok(None);
        };

        debug!(%url, "fetching starred page");
        let page = fetch(url).await?;

        let next = if page.repos.is_empty() { None } else { page.next };
        let repos = stream::iter(page.repos.into_iter().map(Ok::<_, ListStarsError>));

        Ok::<_, ListStarsError>(Some((repos, (next, fetch))))
    })
    .try_flatten()
    .boxed()
}

#[derive(Debug, Error)]
pub enum ListStarsError {
    #[error("GitHub rejected the API token (HTTP {status}); check --github-token or ~/.github_oauth_token")]
    Authentication {
        status: StatusCode,
    },

    #[error("GitHub API rate limit exhausted{}; pass a token to raise the limit", reset_hint(.reset_at))]
    RateLimited {
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("GitHub user {user} not found")]
    UnknownUser {
        user: String,
    },

    #[error("GitHub answered HTTP {status}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        body: String,
    },

    #[error("Network: {source}")]
    Network {
        source: FetchStarredPageError,
    },

    #[error("DeserializeResponseBody: {source}")]
    Decode {
        source: serde_json::Error,
    },
}

fn reset_hint(reset_at: &Option<DateTime<Utc>>) -> String {
    reset_at
        .map(|at| format!(" until {at}"))
        .unwrap_or_default()
}
