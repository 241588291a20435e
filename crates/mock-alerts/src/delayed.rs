//! Delayed wrappers - add artificial latency to a source or a notifier.

use std::time::Duration;

use alert_core::{async_trait, Alert, AlertError, AlertSource, Notification, Notifier};
use tokio::time::sleep;

/// A source that wraps another source and delays every fetch.
///
/// Useful for testing overlapping polls and cancellation of in-flight fetches.
pub struct DelayedSource<S: AlertSource> {
    inner: S,
    delay: Duration,
}

impl<S: AlertSource> DelayedSource<S> {
    /// Create a new DelayedSource wrapping the given source with the specified delay.
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a source with a delay in milliseconds.
    pub fn with_millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<S: AlertSource> AlertSource for DelayedSource<S> {
    async fn fall_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        sleep(self.delay).await;
        self.inner.fall_alerts().await
    }

    async fn environmental_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        sleep(self.delay).await;
        self.inner.environmental_alerts().await
    }

    async fn confirm_fall(&self, alert_id: i64) -> Result<(), AlertError> {
        self.inner.confirm_fall(alert_id).await
    }

    fn name(&self) -> &str {
        "DelayedSource"
    }
}

/// A notifier that waits before handing each notification to the inner one.
///
/// The inner notifier only sees a notification once the delay has elapsed,
/// so a dispatch abandoned mid-delay leaves no record.
pub struct DelayedNotifier<N: Notifier> {
    inner: N,
    delay: Duration,
}

impl<N: Notifier> DelayedNotifier<N> {
    pub fn new(inner: N, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn with_millis(inner: N, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<N: Notifier> Notifier for DelayedNotifier<N> {
    async fn dispatch(&self, notification: Notification) -> Result<(), AlertError> {
        sleep(self.delay).await;
        self.inner.dispatch(notification).await
    }

    fn name(&self) -> &str {
        "DelayedNotifier"
    }
}
