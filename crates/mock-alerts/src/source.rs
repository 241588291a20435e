//! Static alert source - serves whatever alerts the test installs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use alert_core::{async_trait, Alert, AlertError, AlertSource};

#[derive(Debug, Default)]
struct Inner {
    fall: Mutex<Vec<Alert>>,
    environmental: Mutex<Vec<Alert>>,
    confirmed: Mutex<Vec<i64>>,
    fail_fall: AtomicBool,
    fail_environmental: AtomicBool,
    fail_confirm: AtomicBool,
    fetches: AtomicUsize,
}

/// An alert source backed by in-memory lists.
///
/// Clones share state, so a test can keep a handle while the engine owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    inner: Arc<Inner>,
}

impl StaticSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source serving the given alerts, split by category.
    pub fn with_alerts(alerts: Vec<Alert>) -> Self {
        let source = Self::new();
        source.set_alerts(alerts);
        source
    }

    /// Replace the fall alerts.
    pub fn set_fall(&self, alerts: Vec<Alert>) {
        *lock(&self.inner.fall) = alerts;
    }

    /// Replace the environmental alerts.
    pub fn set_environmental(&self, alerts: Vec<Alert>) {
        *lock(&self.inner.environmental) = alerts;
    }

    /// Replace both lists from one combined list, keeping relative order.
    pub fn set_alerts(&self, alerts: Vec<Alert>) {
        let (fall, environmental): (Vec<_>, Vec<_>) = alerts
            .into_iter()
            .partition(|alert| alert.category == alert_core::AlertCategory::Fall);
        self.set_fall(fall);
        self.set_environmental(environmental);
    }

    /// Remove every alert.
    pub fn clear(&self) {
        self.set_alerts(Vec::new());
    }

    /// Make fall fetches fail (or succeed again).
    pub fn fail_fall(&self, fail: bool) {
        self.inner.fail_fall.store(fail, Ordering::SeqCst);
    }

    /// Make environmental fetches fail (or succeed again).
    pub fn fail_environmental(&self, fail: bool) {
        self.inner.fail_environmental.store(fail, Ordering::SeqCst);
    }

    /// Make confirmations fail (or succeed again).
    pub fn fail_confirm(&self, fail: bool) {
        self.inner.fail_confirm.store(fail, Ordering::SeqCst);
    }

    /// Ids passed to `confirm_fall`, in call order.
    pub fn confirmed(&self) -> Vec<i64> {
        lock(&self.inner.confirmed).clone()
    }

    /// Number of category fetches served (successful or not).
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertSource for StaticSource {
    async fn fall_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_fall.load(Ordering::SeqCst) {
            return Err(AlertError::Source("fall endpoint failed".to_string()));
        }
        Ok(lock(&self.inner.fall).clone())
    }

    async fn environmental_alerts(&self) -> Result<Vec<Alert>, AlertError> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_environmental.load(Ordering::SeqCst) {
            return Err(AlertError::Unavailable("environmental endpoint failed".to_string()));
        }
        Ok(lock(&self.inner.environmental).clone())
    }

    async fn confirm_fall(&self, alert_id: i64) -> Result<(), AlertError> {
        if self.inner.fail_confirm.load(Ordering::SeqCst) {
            return Err(AlertError::Source(format!("confirm {} failed", alert_id)));
        }
        lock(&self.inner.confirmed).push(alert_id);
        lock(&self.inner.fall).retain(|alert| alert.id != alert_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "StaticSource"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
