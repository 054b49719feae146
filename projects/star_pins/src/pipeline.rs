use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::github::GitHubStars;
use crate::pinboard::PinboardBookmarks;
use crate::stages::check_recency::index::{check_recency, CheckRecencyError, RecentBookmarks};
use crate::stages::list_stars::index::StarSource;
use crate::stages::write_bookmarks::index::{
    write_bookmarks, BookmarkSink, WriteBookmarksError, WriteSummary,
};

pub const USER_AGENT: &str = concat!("star_pins/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum RunError {
    #[error("BuildHttpClient: {source}")]
    BuildHttpClient {
        source: reqwest::Error,
    },

    #[error(transparent)]
    CheckRecency {
        #[from]
        source: CheckRecencyError,
    },

    #[error(transparent)]
    WriteBookmarks {
        #[from]
        source: WriteBookmarksError,
    },
}

/// One forward pass: open the star listing, look up the cutoff, then write
/// bookmarks while pulling the listing page by page.
pub async fn sync<S, B>(stars: &S, bookmarks: &B, interval: Duration) -> Result<WriteSummary, RunError>
where
    S: StarSource,
    B: RecentBookmarks + BookmarkSink,
{
    let listing = stars.starred();
    let cutoff = check_recency(bookmarks).await?;
    let summary = write_bookmarks(listing, cutoff, bookmarks, interval).await?;

    info!(
        created = summary.created,
        failed = summary.failed,
        duplicates = summary.duplicates,
        reached_cutoff = summary.reached_cutoff,
        "sync finished"
    );

    Ok(summary)
}

pub async fn run(config: &Config) -> Result<WriteSummary, RunError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| RunError::BuildHttpClient { source })?;

    if config.github.token.is_none() {
        warn!("no GitHub token, listing unauthenticated (60 requests per hour)");
    }

    info!(user = %config.github.user, "syncing starred repositories to Pinboard");

    let stars = GitHubStars::new(client.clone(), config.github.clone());
    let bookmarks = PinboardBookmarks::new(client, config.pinboard.clone());

    sync(&stars, &bookmarks, config.write_interval).await
}
