//! The AlertSource and Notifier trait definitions.

use async_trait::async_trait;

use crate::alert::Alert;
use crate::error::AlertError;
use crate::notification::Notification;

/// A producer of currently active alerts.
///
/// Implementations range from the ward REST backend to in-memory fixtures.
/// This trait is object-safe and can be used with `Box<dyn AlertSource>`.
#[async_trait]
pub trait AlertSource: Send + Sync {
    /// Fetch the currently active fall alerts.
    async fn fall_alerts(&self) -> Result<Vec<Alert>, AlertError>;

    /// Fetch the currently active environmental alerts.
    async fn environmental_alerts(&self) -> Result<Vec<Alert>, AlertError>;

    /// Mark a fall alert as acknowledged on the server.
    async fn confirm_fall(&self, alert_id: i64) -> Result<(), AlertError>;

    /// Get a human-readable name for this source.
    fn name(&self) -> &str;
}

/// A transport that surfaces notifications to the user.
///
/// Dispatch is fire-and-forget from the engine's point of view: an error is
/// logged by the caller, never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Surface one notification.
    async fn dispatch(&self, notification: Notification) -> Result<(), AlertError>;

    /// Get a human-readable name for this transport.
    fn name(&self) -> &str {
        "Notifier"
    }
}

#[async_trait]
impl<T: AlertSource + ?Sized> AlertSource for std::sync::Arc<T> {
    async fn fall_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        (**self).fall_alerts().await
    }

    async fn environmental_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        (**self).environmental_alerts().await
    }

    async fn confirm_fall(&self, alert_id: i64) -> Result<(), AlertError> {
        (**self).confirm_fall(alert_id).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn dispatch(&self, notification: Notification) -> Result<(), AlertError> {
        (**self).dispatch(notification).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct OneFall;

    #[async_trait]
    impl AlertSource for OneFall {
        async fn fall_alerts(&self) -> Result<Vec<Alert>, AlertError> {
            Ok(vec![Alert::fall(1, "fall", "101")])
        }

        async fn environmental_alerts(&self) -> Result<Vec<Alert>, AlertError> {
            Err(AlertError::Unavailable("sensor gateway down".to_string()))
        }

        async fn confirm_fall(&self, _alert_id: i64) -> Result<(), AlertError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "OneFall"
        }
    }

    #[tokio::test]
    async fn test_arc_source_delegates() {
        let source: Arc<dyn AlertSource> = Arc::new(OneFall);
        assert_eq!(source.name(), "OneFall");
        assert_eq!(source.fall_alerts().await.unwrap().len(), 1);
        assert!(source.environmental_alerts().await.is_err());
    }
}
