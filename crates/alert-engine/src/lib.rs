//! Alert deduplication and notification dispatch.
//!
//! Given an [`AlertSource`] and a [`Notifier`], the [`AlertEngine`] polls
//! both alert categories, keeps the latest alert per category (or the latest
//! alert for one room), and notifies each alert once until it leaves the
//! feed. The [`Poller`] runs the engine on a fixed interval.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alert_engine::{AlertEngine, EngineConfig, Poller, TracingNotifier};
//! use ward_api::{ApiConfig, HttpAlertSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpAlertSource::from_config(ApiConfig::from_env()?)?;
//! let engine = Arc::new(AlertEngine::new(source, TracingNotifier, EngineConfig::from_env()?));
//!
//! let handle = Poller::new(engine.clone()).spawn();
//! // ... later, when the screen goes away:
//! handle.stop().await;
//! # Ok(())
//! # }
//! ```

mod cancel;
mod config;
mod engine;
mod error;
mod notifiers;
mod poller;
pub mod select;
mod state;

pub use cancel::CancelToken;
pub use config::{
    parse_interval, ConfigError, EngineConfig, Scope, DEFAULT_POLL_INTERVAL, DEFAULT_TITLE,
};
pub use engine::{Ack, AlertEngine, PollResult};
pub use error::EngineError;
pub use notifiers::{ChannelNotifier, TracingNotifier};
pub use poller::{Poller, PollerHandle};
pub use state::{DispatchPolicy, DispatchState};

// Re-export alert-core types for users
pub use alert_core::{
    Alert, AlertCategory, AlertError, AlertSource, CurrentAlerts, Notification, NotificationPayload,
    Notifier,
};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
