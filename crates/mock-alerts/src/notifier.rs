//! Recording notifier - keeps every notification it is handed.

use std::sync::{Arc, Mutex, MutexGuard};

use alert_core::{async_trait, AlertError, Notification, Notifier};

/// A notifier that records notifications instead of showing them.
///
/// Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications dispatched so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Alert ids of all notifications dispatched so far, in order.
    pub fn sent_ids(&self) -> Vec<i64> {
        self.lock().iter().map(|n| n.payload.alert_id).collect()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<(), AlertError> {
        self.lock().push(notification);
        Ok(())
    }

    fn name(&self) -> &str {
        "RecordingNotifier"
    }
}
