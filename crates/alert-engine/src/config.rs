//! Configuration for the alert engine.

use std::env;
use std::time::Duration;

use crate::state::DispatchPolicy;

/// Default time between polling cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default notification title.
pub const DEFAULT_TITLE: &str = "Emergency Alert";

/// Which alerts a view covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// Whole ward: latest fall plus latest environmental alert.
    #[default]
    Ward,
    /// One room: its single latest alert.
    Location(String),
}

/// Configuration for the alert engine and poller.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Time between polling cycles.
    pub poll_interval: Duration,

    /// Title used for every notification.
    pub title: String,

    /// How dispatched ids carry over between cycles.
    pub policy: DispatchPolicy,

    /// Whole ward or a single room.
    pub scope: Scope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            title: DEFAULT_TITLE.to_string(),
            policy: DispatchPolicy::default(),
            scope: Scope::default(),
        }
    }
}

impl EngineConfig {
    /// Create a config scoped to one room.
    pub fn for_location(location_id: impl Into<String>) -> Self {
        Self {
            scope: Scope::Location(location_id.into()),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WARD_POLL_INTERVAL_SECS` | Seconds between polls (> 0) | `30` |
    /// | `WARD_NOTIFICATION_TITLE` | Notification title | `Emergency Alert` |
    /// | `WARD_DISPATCH_POLICY` | `replace` or `union` | `replace` |
    /// | `WARD_LOCATION` | Room to scope the view to | (whole ward) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("WARD_POLL_INTERVAL_SECS") {
            config.poll_interval = parse_interval(&raw)?;
        }

        if let Ok(title) = env::var("WARD_NOTIFICATION_TITLE") {
            config.title = title;
        }

        if let Ok(raw) = env::var("WARD_DISPATCH_POLICY") {
            config.policy = raw.parse().map_err(ConfigError::InvalidPolicy)?;
        }

        if let Ok(location) = env::var("WARD_LOCATION") {
            if !location.trim().is_empty() {
                config.scope = Scope::Location(location.trim().to_string());
            }
        }

        Ok(config)
    }
}

/// Parse a positive number of seconds.
pub fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidInterval(raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid WARD_POLL_INTERVAL_SECS: {0}")]
    InvalidInterval(String),

    #[error("Invalid WARD_DISPATCH_POLICY: {0}")]
    InvalidPolicy(String),
}
