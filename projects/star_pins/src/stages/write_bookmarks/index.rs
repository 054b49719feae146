use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use interfaces_pinboard_posts::index::AddPostError;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::bookmark::Bookmark;
use crate::models::star::StarredRepository;
use crate::stages::check_recency::index::Cutoff;
use crate::stages::list_stars::index::{ListStarsError, StarStream};

#[async_trait]
pub trait BookmarkSink {
    async fn add(&self, bookmark: &Bookmark) -> Result<(), WriteError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub created: usize,
    pub failed: usize,
    /// Repositories listed twice in the same run.
    pub duplicates: usize,
    /// Whether the listing was cut short at the cutoff.
    pub reached_cutoff: bool,
}

/// Bookmarks every star newer than `cutoff`, in listing order.
///
/// The listing is read up to the cutoff before the first write, so a listing
/// error leaves the store untouched and a re-run picks up every new star.
/// Per-item failures are logged and skipped; a rejected token aborts.
/// Consecutive writes are spaced by `interval`.
pub async fn write_bookmarks<S>(
    stars: StarStream<'_>,
    cutoff: Cutoff,
    sink: &S,
    interval: Duration,
) -> Result<WriteSummary, WriteBookmarksError>
where
    S: BookmarkSink + ?Sized,
{
    let mut summary = WriteSummary::default();
    let pending = collect_new_stars(stars, cutoff, &mut summary).await?;
    info!(count = pending.len(), "new stars to bookmark");

    for (attempted, repo) in pending.into_iter().enumerate() {
        if attempted > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }

        let bookmark = Bookmark::from_star(&repo);
        match sink.add(&bookmark).await {
            Ok(()) => {
                info!(repo = %repo.full_name, tags = ?bookmark.tag_list(), "bookmark added");
                summary.created += 1;
            }
            Err(source) if source.is_fatal() => {
                return Err(WriteBookmarksError::Write {
                    repo: repo.full_name,
                    source,
                });
            }
            Err(err) => {
                warn!(repo = %repo.full_name, error = %err, "bookmark not added, skipping");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Pulls the newest-first listing until the first star at or before the
/// cutoff, dropping repeated URLs. Later pages are never fetched.
async fn collect_new_stars(
    mut stars: StarStream<'_>,
    cutoff: Cutoff,
    summary: &mut WriteSummary,
) -> Result<Vec<StarredRepository>, WriteBookmarksError> {
    let mut seen = HashSet::new();
    let mut pending = Vec::new();

    while let Some(repo) = stars
        .try_next()
        .await
        .map_err(|source| WriteBookmarksError::ListStars { source })?
    {
        if is_not_newer(&repo, cutoff) {
            info!(
                repo = %repo.full_name,
                starred_at = %repo.starred_at,
                "reached cutoff, remaining stars are older"
            );
            summary.reached_cutoff = true;
            break;
        }

        if !seen.insert(repo.url.clone()) {
            warn!(repo = %repo.full_name, "listed twice, skipping");
            summary.duplicates += 1;
            continue;
        }

        pending.push(repo);
    }

    Ok(pending)
}

fn is_not_newer(repo: &StarredRepository, cutoff: Cutoff) -> bool {
    cutoff.is_some_and(|at| repo.starred_at <= at)
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Pinboard rejected the API token (HTTP {status}); check --pinboard-token or ~/.pinboard_api_token")]
    Authentication {
        status: StatusCode,
    },

    /// Pinboard answered with a `result_code` other than `done`, e.g.
    /// "item already exists".
    #[error("Pinboard refused the bookmark: {result_code}")]
    Rejected {
        result_code: String,
    },

    #[error("Pinboard rate limit hit")]
    RateLimited,

    #[error("Pinboard answered HTTP {status}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        body: String,
    },

    #[error("Network: {source}")]
    Network {
        source: AddPostError,
    },

    #[error("DeserializeResponseBody: {source}")]
    Decode {
        source: serde_json::Error,
    },
}

impl WriteError {
    /// Errors that would fail every remaining write too.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WriteError::Authentication { .. })
    }
}

#[derive(Debug, Error)]
pub enum WriteBookmarksError {
    #[error(transparent)]
    ListStars {
        source: ListStarsError,
    },

    #[error("{source} (while adding {repo})")]
    Write {
        repo: String,
        source: WriteError,
    },
}
