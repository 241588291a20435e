//! Error types for ward-api.

use alert_core::AlertError;
use thiserror::Error;

/// Errors that can occur when talking to the ward backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend rejected the credentials and the token could not be refreshed.
    #[error("Unauthorized")]
    Unauthorized,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<ApiError> for AlertError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) if e.is_timeout() || e.is_connect() => {
                AlertError::Unavailable(e.to_string())
            }
            other => AlertError::Source(other.to_string()),
        }
    }
}
