//! Drafts a release changelog snippet from the pull requests merged into a
//! GitHub repository since a previous release.
pub mod changelog;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod forge;

pub use cli::Args;
pub use error::{ReleaseNotesError, Result};
