//! Pins GitHub starred repositories as Pinboard bookmarks
//!
//! - The three sync stages in `stages/`
//! - GitHub and Pinboard adapters in `github` and `pinboard`
//! - Token and endpoint resolution in `config`
//! - Optional GITHUB_TOKEN, required PINBOARD_TOKEN (or the matching dotfiles)

pub mod config;
pub mod github;
pub mod models;
pub mod pinboard;
pub mod pipeline;
mod response;
pub mod stages;
