//! Error types for combine-prs

use thiserror::Error;

/// Errors produced while combining pull requests
#[derive(Debug, Error)]
pub enum Error {
    /// Generic GitHub API failure
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Remote resource not found (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// Remote rejected the request as unprocessable (422), e.g. ref already exists
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// Branch merge hit conflicting content (409)
    #[error("merge conflict: {0}")]
    MergeConflict(String),

    /// No usable token could be found
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository slug or URL could not be parsed
    #[error("invalid repository: {0}")]
    InvalidRepository(String),

    /// Platform-level failure not tied to a specific HTTP status
    #[error("platform error: {0}")]
    Platform(String),
}

impl Error {
    /// Whether this error represents a 404 from the remote
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error represents a 422 from the remote
    pub const fn is_unprocessable(&self) -> bool {
        matches!(self, Self::Unprocessable(_))
    }

    /// Map an HTTP status and message to the matching variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            409 => Self::MergeConflict(message),
            422 => Self::Unprocessable(message),
            _ => Self::GitHubApi(format!("{status}: {message}")),
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                Self::from_status(source.status_code.as_u16(), source.message.clone())
            }
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
