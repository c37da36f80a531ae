//! Client error types.

use thiserror::Error;

/// Client error type.
///
/// Failures of an individual attendance request are reported through
/// [`AttendanceResult`](crate::AttendanceResult), not here.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials or client settings are unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be built.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An endpoint URL is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Check if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
