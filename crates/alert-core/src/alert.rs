//! Alert values and the UI-facing view.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First id handed to synthesized environmental alerts.
///
/// Fall incident ids come from the backend and stay below this value, so the
/// two namespaces do not collide within one polling cycle.
pub const ENVIRONMENTAL_ID_BASE: i64 = 1000;

/// Category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    /// A detected patient fall.
    Fall,
    /// A room temperature/humidity reading outside the normal range.
    Environmental,
}

impl AlertCategory {
    /// Guess the category of an alert id from the id-offset convention.
    pub fn from_id_convention(id: i64) -> Self {
        if id < ENVIRONMENTAL_ID_BASE {
            AlertCategory::Fall
        } else {
            AlertCategory::Environmental
        }
    }

    /// Stable lowercase name, as used in notification payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Fall => "fall",
            AlertCategory::Environmental => "environmental",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temperature and humidity attached to an environmental alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    /// Room temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
}

/// One reportable incident or condition.
///
/// Alerts are passed through as produced by the source; nothing beyond
/// `id`, `category` and `observed_at` is interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Identifier, unique within a category namespace.
    pub id: i64,

    /// Fall or environmental.
    pub category: AlertCategory,

    /// Human-readable description, pre-formatted by the source.
    #[serde(default)]
    pub message: String,

    /// Room the alert concerns.
    #[serde(default)]
    pub location_id: Option<String>,

    /// When the incident was observed. Absent for environmental alerts.
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,

    /// Sensor reading for environmental alerts.
    #[serde(default)]
    pub reading: Option<EnvironmentalReading>,
}

impl Alert {
    /// Create a fall alert without a timestamp.
    pub fn fall(id: i64, message: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            id,
            category: AlertCategory::Fall,
            message: message.into(),
            location_id: Some(location_id.into()),
            observed_at: None,
            reading: None,
        }
    }

    /// Create an environmental alert without a reading.
    pub fn environmental(
        id: i64,
        message: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category: AlertCategory::Environmental,
            message: message.into(),
            location_id: Some(location_id.into()),
            observed_at: None,
            reading: None,
        }
    }

    /// Set the observation timestamp.
    pub fn observed(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }

    /// Attach a temperature/humidity reading.
    pub fn with_reading(mut self, temperature: Option<f64>, humidity: Option<f64>) -> Self {
        self.reading = Some(EnvironmentalReading {
            temperature,
            humidity,
        });
        self
    }

    /// Check whether this alert concerns the given room.
    pub fn is_at(&self, location_id: &str) -> bool {
        self.location_id.as_deref() == Some(location_id)
    }
}

/// The bounded set of alerts currently shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAlerts {
    /// Selected alerts, fall first.
    pub items: Vec<Alert>,
    /// When this view was produced.
    pub last_refreshed: DateTime<Utc>,
    /// Ids notified during the cycle that produced this view.
    #[serde(default)]
    pub dispatched: Vec<i64>,
}

impl CurrentAlerts {
    /// Create an empty view stamped with the current time.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            last_refreshed: Utc::now(),
            dispatched: Vec::new(),
        }
    }

    /// Ids of the alerts in the view, in display order.
    pub fn ids(&self) -> Vec<i64> {
        self.items.iter().map(|alert| alert.id).collect()
    }

    /// Look up an alert in the view.
    pub fn get(&self, alert_id: i64) -> Option<&Alert> {
        self.items.iter().find(|alert| alert.id == alert_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
