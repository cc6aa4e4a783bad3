//! Changelog snippet generation: commit normalization, deduplication against
//! an existing changelog, label classification and markdown rendering.

/// Domain commit records built from raw history pages.
pub mod commit;

/// Markdown rendering of grouped changelog lines.
pub mod renderer;

/// Changelog sections and label routing rules.
pub mod section;

/// Pull requests already published in an existing changelog.
pub mod seen;
