//! `AlertSource` backed by the ward REST API.

use alert_core::{async_trait, Alert, AlertError, AlertSource, ENVIRONMENTAL_ID_BASE};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::client::WardClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{EnvironmentalRow, FallIncident};

/// Naive timestamp layouts the backend has been seen to emit, read as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Alert source reading fall incidents and environmental warnings from the
/// ward backend.
#[derive(Debug, Clone)]
pub struct HttpAlertSource {
    client: WardClient,
}

impl HttpAlertSource {
    /// Wrap an existing client.
    pub fn new(client: WardClient) -> Self {
        Self { client }
    }

    /// Build a client from configuration and wrap it.
    pub fn from_config(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(WardClient::new(config)?))
    }

    /// Get the underlying client.
    pub fn client(&self) -> &WardClient {
        &self.client
    }
}

#[async_trait]
impl AlertSource for HttpAlertSource {
    async fn fall_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        let rows = self.client.fall_incidents().await?;
        let alerts = fall_alerts_from(&rows, self.client.config().fall_incident_limit);
        debug!(rows = rows.len(), alerts = alerts.len(), "Fetched fall incidents");
        Ok(alerts)
    }

    async fn environmental_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        let rows = self.client.environmental_readings().await?;
        let alerts = environmental_alerts_from(&rows);
        debug!(rows = rows.len(), alerts = alerts.len(), "Fetched environmental readings");
        Ok(alerts)
    }

    async fn confirm_fall(&self, alert_id: i64) -> Result<(), AlertError> {
        self.client
            .confirm_fall_incident(alert_id)
            .await
            .map_err(AlertError::from)
    }

    fn name(&self) -> &str {
        "HttpAlertSource"
    }
}

/// Map fall incident rows to alerts.
///
/// Only the first `limit` rows are considered, and of those only the ones
/// flagged as active falls.
pub fn fall_alerts_from(rows: &[FallIncident], limit: usize) -> Vec<Alert> {
    rows.iter()
        .take(limit)
        .filter(|row| row.is_active())
        .map(|row| {
            let mut alert = Alert::fall(
                row.accident_id,
                format!("🚨 Room {} - {} fall detected", row.room_name, row.patient_name),
                row.room_name.clone(),
            );
            alert.observed_at = row.accident_date.as_deref().and_then(parse_timestamp);
            alert
        })
        .collect()
}

/// Map environmental rows to alerts.
///
/// Rooms in the normal range are dropped. Ids are synthesized from the
/// position among warning rows, starting at [`ENVIRONMENTAL_ID_BASE`].
pub fn environmental_alerts_from(rows: &[EnvironmentalRow]) -> Vec<Alert> {
    rows.iter()
        .filter(|row| row.is_warning())
        .enumerate()
        .map(|(index, row)| {
            let message = format!(
                "⚠️ Room {} environment abnormal (temperature: {}°C, humidity: {}%)",
                row.room_name,
                display_reading(row.room_temp),
                display_reading(row.humidity),
            );
            let id = ENVIRONMENTAL_ID_BASE + index as i64;
            Alert::environmental(id, message, row.room_name.clone())
                .with_reading(row.room_temp, row.humidity)
        })
        .collect()
}

/// Parse a backend timestamp. Unrecognized input yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn display_reading(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "--".to_string())
}
