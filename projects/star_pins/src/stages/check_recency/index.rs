use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interfaces_pinboard_posts::index::FetchRecentPostsError;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;

use crate::models::bookmark::MARKER_TAG;

/// Creation time of the newest marker-tagged bookmark. `None` on a first run.
///
/// Compared against GitHub star times, which come from a different clock, so
/// deduplication across runs is best-effort.
pub type Cutoff = Option<DateTime<Utc>>;

#[async_trait]
pub trait RecentBookmarks {
    /// Creation time of the newest bookmark carrying `tag`.
    async fn latest_tagged(&self, tag: &str) -> Result<Cutoff, CheckRecencyError>;
}

pub async fn check_recency<R>(store: &R) -> Result<Cutoff, CheckRecencyError>
where
    R: RecentBookmarks + ?Sized,
{
    let cutoff = store.latest_tagged(MARKER_TAG).await?;

    match cutoff {
        Some(at) => info!(cutoff = %at, "newest {MARKER_TAG} bookmark found"),
        None => info!("no {MARKER_TAG} bookmarks yet, every star is a candidate"),
    }

    Ok(cutoff)
}

#[derive(Debug, Error)]
pub enum CheckRecencyError {
    #[error("Pinboard rejected the API token (HTTP {status}); check --pinboard-token or ~/.pinboard_api_token")]
    Authentication {
        status: StatusCode,
    },

    #[error("Pinboard rate limit hit while looking up the newest bookmark")]
    RateLimited,

    #[error("Pinboard answered HTTP {status}: {body}")]
    UnexpectedStatus {
        status: StatusCode,
        body: String,
    },

    #[error("Network: {source}")]
    Network {
        source: FetchRecentPostsError,
    },

    #[error("DeserializeResponseBody: {source}")]
    Decode {
        source: serde_json::Error,
    },
}
