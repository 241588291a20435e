//! Ward monitoring backend client library.
//!
//! This crate provides a Rust client for the ward monitoring REST backend.
//! It supports:
//!
//! - Fetching fall incidents and environmental readings
//! - Confirming fall incidents and marking alerts as read
//! - Bearer-token login with a single refresh-and-retry on HTTP 401
//! - An [`alert_core::AlertSource`] implementation, [`HttpAlertSource`]
//!
//! # Example
//!
//! ```no_run
//! use alert_core::AlertSource;
//! use ward_api::{ApiConfig, HttpAlertSource, WardClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WardClient::connect(ApiConfig::default()).await?;
//! client.login("nurse01", "secret").await?;
//!
//! let source = HttpAlertSource::new(client);
//! for alert in source.fall_alerts().await? {
//!     println!("{}: {}", alert.id, alert.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use client::WardClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use source::{environmental_alerts_from, fall_alerts_from, parse_timestamp, HttpAlertSource};
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
