pub mod check_recency;
pub mod list_stars;
pub mod write_bookmarks;
