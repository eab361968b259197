//! Error types for GitBucket repository resolution and platform operations.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for gitbucket-keeper operations.
#[derive(Error, Debug)]
pub enum KeeperError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("No git repository found at {}", .0.display())]
    NotARepository(PathBuf),

    // Platform state errors
    #[error("GitBucket REST client has not been initialised")]
    NotInitialised,

    #[error("{0} has not yet been implemented for GitBucket")]
    NotSupported(String),

    // Network/API errors
    #[error("GitBucket API error: {0}")]
    Platform(String),

    // Update proposal errors
    #[error("Invalid package update: {0}")]
    InvalidUpdateSet(String),

    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),
}

/// Result type alias using KeeperError
pub type Result<T> = std::result::Result<T, KeeperError>;

impl KeeperError {
    /// Create a platform error with context
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid update set error
    pub fn invalid_update(msg: impl Into<String>) -> Self {
        Self::InvalidUpdateSet(msg.into())
    }
}

// Client construction and header failures surface as platform errors so raw
// transport errors never leak to callers.
impl From<reqwest::Error> for KeeperError {
    fn from(err: reqwest::Error) -> Self {
        Self::Platform(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for KeeperError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::Platform(format!("Invalid header value: {}", err))
    }
}
