//! GitHub REST client for the "starred repositories" listing
//!
//! Transport only: one call fetches one page and hands back the raw body,
//! status and pagination headers. Interpreting them is left to the caller.

pub mod index;
