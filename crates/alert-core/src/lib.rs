//! Core types and traits for ward alert processing.
//!
//! This crate provides the shared interface between the alert engine and
//! its collaborators. It defines:
//!
//! - [`Alert`] / [`AlertCategory`] - One reportable incident or condition
//! - [`AlertSource`] - The trait that backends producing alerts implement
//! - [`Notifier`] / [`Notification`] - The notification transport seam
//! - [`CurrentAlerts`] - The bounded view handed to the UI layer
//! - [`AlertError`] - Error types for source and transport operations
//!
//! # Example
//!
//! ```rust
//! use alert_core::{Alert, AlertError, AlertSource};
//! use async_trait::async_trait;
//!
//! struct NightShift;
//!
//! #[async_trait]
//! impl AlertSource for NightShift {
//!     async fn fall_alerts(&self) -> Result<Vec<Alert>, AlertError> {
//!         Ok(vec![Alert::fall(7, "Room 203 - fall detected", "203")])
//!     }
//!
//!     async fn environmental_alerts(&self) -> Result<Vec<Alert>, AlertError> {
//!         Ok(Vec::new())
//!     }
//!
//!     async fn confirm_fall(&self, _alert_id: i64) -> Result<(), AlertError> {
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "NightShift"
//!     }
//! }
//! ```

mod alert;
mod error;
mod notification;
mod trait_def;

pub use alert::{Alert, AlertCategory, CurrentAlerts, EnvironmentalReading, ENVIRONMENTAL_ID_BASE};
pub use error::AlertError;
pub use notification::{Notification, NotificationPayload};
pub use trait_def::{AlertSource, Notifier};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
