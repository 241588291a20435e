//! Mock alert collaborators for testing the alert engine.
//!
//! This crate provides in-memory implementations of the `alert-core` traits:
//! - `StaticSource` - Serves configurable alert lists, with failure switches
//! - `DelayedSource` - Wraps another source with artificial fetch delay
//! - `RecordingNotifier` - Records every dispatched notification
//! - `DelayedNotifier` - Wraps another notifier with artificial dispatch delay
//!
//! For the real backend, use the `ward-api` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_alerts::{Alert, AlertSource, StaticSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_alerts::AlertError> {
//!     let source = StaticSource::new();
//!     source.set_fall(vec![Alert::fall(1, "Room 101 - fall detected", "101")]);
//!
//!     let alerts = source.fall_alerts().await?;
//!     assert_eq!(alerts.len(), 1);
//!     Ok(())
//! }
//! ```

mod delayed;
mod notifier;
mod source;

// Re-export alert-core types for convenience
pub use alert_core::{
    async_trait, Alert, AlertCategory, AlertError, AlertSource, Notification, Notifier,
};

// Export mock implementations
pub use delayed::{DelayedNotifier, DelayedSource};
pub use notifier::RecordingNotifier;
pub use source::StaticSource;
