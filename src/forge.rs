//! Query client for the GitHub GraphQL API.
//!
//! Resolves release references to commit timestamps and walks branch history
//! page by page, one request at a time.

/// Connection settings for the remote repository.
pub mod config;

/// GitHub GraphQL client implementation.
pub mod github;

/// Transport abstraction for sending GraphQL requests.
pub mod traits;
