//! Configuration types for ward-api.

use std::env;
use std::time::Duration;

use crate::error::ApiError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of fall incidents considered per fetch.
pub const DEFAULT_FALL_INCIDENT_LIMIT: usize = 10;

/// Configuration for connecting to the ward backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g., "http://localhost:3000").
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Only the first N fall incidents returned by the backend are used.
    pub fall_incident_limit: usize,
}

impl ApiConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            fall_incident_limit: DEFAULT_FALL_INCIDENT_LIMIT,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the fall incident limit.
    pub fn with_fall_incident_limit(mut self, limit: usize) -> Self {
        self.fall_incident_limit = limit;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WARD_API_URL` | Backend base URL | `http://localhost:3000` |
    /// | `WARD_API_TIMEOUT_SECS` | Request timeout in seconds | `10` |
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url =
            env::var("WARD_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let mut config = Self::new(base_url);

        if let Ok(raw) = env::var("WARD_API_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|_| ApiError::Config(format!("invalid WARD_API_TIMEOUT_SECS: {}", raw)))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Get the fall incidents endpoint URL.
    pub fn fall_incidents_url(&self) -> String {
        format!("{}/api/fall-incidents", self.base_url)
    }

    /// Get the confirmation endpoint URL for a fall incident.
    pub fn confirm_url(&self, incident_id: i64) -> String {
        format!("{}/api/fall-incidents/{}/confirm", self.base_url, incident_id)
    }

    /// Get the environmental readings endpoint URL.
    pub fn environmental_url(&self) -> String {
        format!("{}/api/environmental", self.base_url)
    }

    /// Get the mark-as-read endpoint URL for an alert.
    pub fn read_url(&self, alert_id: i64) -> String {
        format!("{}/api/alerts/{}/read", self.base_url, alert_id)
    }

    /// Get the login endpoint URL.
    pub fn login_url(&self) -> String {
        format!("{}/api/auth/login", self.base_url)
    }

    /// Get the logout endpoint URL.
    pub fn logout_url(&self) -> String {
        format!("{}/api/auth/logout", self.base_url)
    }

    /// Get the token refresh endpoint URL.
    pub fn refresh_url(&self) -> String {
        format!("{}/api/auth/refresh", self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
