//! Built-in notification transports.

use alert_core::{async_trait, AlertError, Notification, Notifier};
use tokio::sync::mpsc;
use tracing::info;

/// Writes each notification to the log.
///
/// The default transport for headless monitors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), AlertError> {
        let payload = &notification.payload;
        info!(
            target: "ward_alerts::notification",
            alert_id = payload.alert_id,
            category = %payload.category,
            location = payload.location_id.as_deref().unwrap_or("-"),
            "{}: {}",
            notification.title,
            notification.body
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "TracingNotifier"
    }
}

/// Forwards notifications to a channel, for an embedding UI to display.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), AlertError> {
        self.tx
            .send(notification)
            .await
            .map_err(|_| AlertError::Notify("notification channel closed".to_string()))
    }

    fn name(&self) -> &str {
        "ChannelNotifier"
    }
}
