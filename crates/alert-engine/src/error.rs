//! Error types for the alert engine.

use alert_core::AlertError;
use thiserror::Error;

/// Errors surfaced by engine operations.
///
/// Polling never fails; only user-initiated operations such as `confirm`
/// return these.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The alert source rejected the operation.
    #[error("source error: {0}")]
    Source(#[from] AlertError),

    /// The engine's session has been shut down.
    #[error("engine shut down")]
    Cancelled,
}
