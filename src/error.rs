//! Custom error types for release-notes.

use std::num::ParseIntError;

use thiserror::Error;

/// Main error type for release-notes operations.
#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    // Network/API errors
    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Git reference not found: {0}")]
    NotFound(String),

    #[error("Network request failed: {0}")]
    TransportError(String),

    #[error("GraphQL API error: {0}")]
    GraphApiError(String),

    // Local file errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Parsing errors
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Template rendering failed: {0}")]
    TemplateError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),
}

/// Result type alias using ReleaseNotesError
pub type Result<T> = std::result::Result<T, ReleaseNotesError>;

impl ReleaseNotesError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a not found error for an unresolvable git reference
    pub fn not_found(reference: impl Into<String>) -> Self {
        Self::NotFound(reference.into())
    }

    /// Create a graph api error from a structured error payload
    pub fn graph_api(msg: impl Into<String>) -> Self {
        Self::GraphApiError(msg.into())
    }

    /// Maps a GitHub HTTP error status. Rejected credentials surface as
    /// authentication errors, everything else as a transport failure.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();

        match status {
            401 | 403 => Self::AuthenticationError(message),
            _ => Self::TransportError(format!("status {status}: {message}")),
        }
    }
}

impl From<ParseIntError> for ReleaseNotesError {
    fn from(err: ParseIntError) -> Self {
        Self::ParseError(err.to_string())
    }
}

// tera hides the interesting part of the failure in its source chain
impl From<tera::Error> for ReleaseNotesError {
    fn from(err: tera::Error) -> Self {
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);

        while let Some(cause) = source {
            msg = format!("{msg}: {cause}");
            source = cause.source();
        }

        Self::TemplateError(msg)
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ReleaseNotesError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => Self::from_status(
                source.status_code.as_u16(),
                source.message.clone(),
            ),
            _ => Self::TransportError(format!("GitHub API error: {}", err)),
        }
    }
}
