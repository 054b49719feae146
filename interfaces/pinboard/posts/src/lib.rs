//! Pinboard v1 API client for the `posts/*` endpoints
//!
//! - `posts/recent` to find the newest bookmark under a tag
//! - `posts/add` to create a bookmark
//!
//! Requests authenticate with the `auth_token` query parameter.

pub mod index;
