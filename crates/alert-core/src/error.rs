//! Error types for alert sources and notification transports.

use thiserror::Error;

/// Errors that can occur when talking to an alert collaborator.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The alert source failed to produce alerts.
    #[error("alert source error: {0}")]
    Source(String),

    /// The alert source is temporarily unavailable.
    #[error("alert source unavailable: {0}")]
    Unavailable(String),

    /// The notification transport rejected a notification.
    #[error("notification failed: {0}")]
    Notify(String),
}
