//! Local notification content.

use serde::{Deserialize, Serialize};

use crate::alert::{Alert, AlertCategory};

/// Routing data carried by a notification, used when the user taps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Room the alert concerns.
    pub location_id: Option<String>,
    /// The alert being surfaced.
    pub alert_id: i64,
    /// Category of the alert.
    pub category: AlertCategory,
}

/// A local notification handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
}

impl Notification {
    /// Build the notification for an alert.
    ///
    /// Fall alerts use their message as the body. Environmental alerts with
    /// a reading get a temperature/humidity line; missing values render as
    /// `--`.
    pub fn for_alert(title: impl Into<String>, alert: &Alert) -> Self {
        let body = match (alert.category, alert.reading) {
            (AlertCategory::Environmental, Some(reading)) => {
                let room = alert.location_id.as_deref().unwrap_or("--");
                format!(
                    "⚠️ Room {} environment abnormal (temperature: {}°C, humidity: {}%)",
                    room,
                    format_value(reading.temperature),
                    format_value(reading.humidity),
                )
            }
            _ => alert.message.clone(),
        };

        Self {
            title: title.into(),
            body,
            payload: NotificationPayload {
                location_id: alert.location_id.clone(),
                alert_id: alert.id,
                category: alert.category,
            },
        }
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}", v),
        None => "--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_body_is_message() {
        let alert = Alert::fall(4, "🚨 Room 101 - Kim fall detected", "101");
        let notification = Notification::for_alert("Emergency Alert", &alert);
        assert_eq!(notification.title, "Emergency Alert");
        assert_eq!(notification.body, "🚨 Room 101 - Kim fall detected");
        assert_eq!(notification.payload.alert_id, 4);
        assert_eq!(notification.payload.category, AlertCategory::Fall);
        assert_eq!(notification.payload.location_id.as_deref(), Some("101"));
    }

    #[test]
    fn test_environmental_body_uses_reading() {
        let alert = Alert::environmental(1000, "ignored", "203").with_reading(Some(31.5), None);
        let notification = Notification::for_alert("Emergency Alert", &alert);
        assert_eq!(
            notification.body,
            "⚠️ Room 203 environment abnormal (temperature: 31.5°C, humidity: --%)"
        );
    }

    #[test]
    fn test_environmental_without_reading_falls_back_to_message() {
        let alert = Alert::environmental(1001, "too humid", "204");
        let notification = Notification::for_alert("t", &alert);
        assert_eq!(notification.body, "too humid");
    }

    #[test]
    fn test_blank_fields_pass_through() {
        let mut alert = Alert::fall(9, "", "x");
        alert.location_id = None;
        let notification = Notification::for_alert("t", &alert);
        assert_eq!(notification.body, "");
        assert!(notification.payload.location_id.is_none());
    }
}
