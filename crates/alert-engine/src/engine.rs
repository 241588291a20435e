//! The alert deduplication and dispatch engine.

use alert_core::{
    Alert, AlertCategory, AlertError, AlertSource, CurrentAlerts, Notification, Notifier,
};
use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::select::select_view;
use crate::state::DispatchState;

/// Outcome of one polling cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    /// The view was rebuilt; new alerts were notified.
    Refreshed(CurrentAlerts),
    /// Another cycle was still running (only from `try_poll`).
    Busy,
    /// The engine was shut down before the cycle could take effect.
    Cancelled,
}

impl PollResult {
    /// The refreshed view, if any.
    pub fn into_view(self) -> Option<CurrentAlerts> {
        match self {
            PollResult::Refreshed(view) => Some(view),
            _ => None,
        }
    }
}

/// Result of confirming an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// The server recorded the acknowledgment (fall alerts).
    Confirmed,
    /// Dismissed locally only (environmental alerts).
    Dismissed,
}

#[derive(Debug, Default)]
struct EngineState {
    dispatch: DispatchState,
    view: Option<CurrentAlerts>,
    cycles: u64,
}

/// Turns polled alert lists into a bounded view and one notification per
/// newly observed alert.
///
/// One engine corresponds to one screen session. Cycles on the same engine
/// never overlap: `poll` waits for a running cycle to finish, `try_poll`
/// returns [`PollResult::Busy`] instead.
pub struct AlertEngine<S: AlertSource, N: Notifier> {
    source: S,
    notifier: N,
    config: EngineConfig,
    state: Mutex<EngineState>,
    cancel: CancelToken,
}

impl<S: AlertSource, N: Notifier> AlertEngine<S, N> {
    /// Create a new engine with an empty dispatch state.
    pub fn new(source: S, notifier: N, config: EngineConfig) -> Self {
        let state = EngineState {
            dispatch: DispatchState::new(config.policy),
            ..Default::default()
        };
        Self {
            source,
            notifier,
            config,
            state: Mutex::new(state),
            cancel: CancelToken::new(),
        }
    }

    /// Create an engine with default configuration.
    pub fn with_defaults(source: S, notifier: N) -> Self {
        Self::new(source, notifier, EngineConfig::default())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The token that ends this engine's session.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// End the session. Cycles still in flight dispatch nothing further.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            info!("Shutting down alert engine (source: {})", self.source.name());
        }
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run one polling cycle, waiting for any cycle already in flight.
    pub async fn poll(&self) -> PollResult {
        let state = self.state.lock().await;
        self.run_cycle(state).await
    }

    /// Run one polling cycle unless another is in flight.
    pub async fn try_poll(&self) -> PollResult {
        match self.state.try_lock() {
            Ok(state) => self.run_cycle(state).await,
            Err(_) => {
                debug!("Poll skipped: previous cycle still running");
                PollResult::Busy
            }
        }
    }

    /// Acknowledge an alert.
    ///
    /// Fall alerts are confirmed on the server; environmental alerts are
    /// only dismissed locally. Either way the alert leaves the current view
    /// until the source reports it again.
    pub async fn confirm(&self, alert_id: i64) -> Result<Ack, EngineError> {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let known = {
            let state = self.state.lock().await;
            state
                .view
                .as_ref()
                .and_then(|view| view.get(alert_id))
                .map(|alert| alert.category)
        };
        let category = known.unwrap_or_else(|| AlertCategory::from_id_convention(alert_id));

        let ack = match category {
            AlertCategory::Fall => {
                self.source.confirm_fall(alert_id).await?;
                info!(alert_id, "Fall alert confirmed");
                Ack::Confirmed
            }
            AlertCategory::Environmental => {
                info!(alert_id, "Environmental alert dismissed");
                Ack::Dismissed
            }
        };

        let mut state = self.state.lock().await;
        if let Some(view) = state.view.as_mut() {
            view.items.retain(|alert| alert.id != alert_id);
        }

        Ok(ack)
    }

    /// The last view produced, minus locally confirmed alerts.
    pub async fn current(&self) -> Option<CurrentAlerts> {
        self.state.lock().await.view.clone()
    }

    /// Snapshot of the dispatched-id set.
    pub async fn dispatch_state(&self) -> DispatchState {
        self.state.lock().await.dispatch.clone()
    }

    /// Forget dispatched ids and the last view, as on a remount.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.dispatch.reset();
        state.view = None;
        debug!("Alert engine state reset");
    }

    async fn run_cycle(&self, mut state: MutexGuard<'_, EngineState>) -> PollResult {
        if self.cancel.is_cancelled() {
            return PollResult::Cancelled;
        }

        let alerts = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("Poll abandoned during fetch: engine shut down");
                return PollResult::Cancelled;
            }
            alerts = self.fetch_all() => alerts,
        };

        let items = select_view(&alerts, &self.config.scope);
        let current_ids: Vec<i64> = items.iter().map(|alert| alert.id).collect();
        let mut pending = state.dispatch.new_ids(&current_ids);

        let mut dispatched = Vec::with_capacity(pending.len());
        for alert in &items {
            let Some(pos) = pending.iter().position(|id| *id == alert.id) else {
                continue;
            };
            pending.swap_remove(pos);

            if self.cancel.is_cancelled() {
                debug!("Poll discarded before dispatch: engine shut down");
                return PollResult::Cancelled;
            }
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(alert_id = alert.id, "Dispatch abandoned: engine shut down");
                    return PollResult::Cancelled;
                }
                () = self.dispatch(alert) => {}
            }
            dispatched.push(alert.id);
        }

        // A shutdown during the last dispatch still discards the cycle.
        if self.cancel.is_cancelled() {
            return PollResult::Cancelled;
        }

        state.dispatch.record(&current_ids);
        state.cycles += 1;

        let view = CurrentAlerts {
            items,
            last_refreshed: Utc::now(),
            dispatched,
        };
        debug!(
            cycle = state.cycles,
            fetched = alerts.len(),
            shown = view.items.len(),
            notified = view.dispatched.len(),
            "Poll cycle complete"
        );
        state.view = Some(view.clone());

        PollResult::Refreshed(view)
    }

    /// Fetch both categories concurrently; a failing category contributes
    /// nothing.
    async fn fetch_all(&self) -> Vec<Alert> {
        let (fall, environmental) = tokio::join!(
            self.source.fall_alerts(),
            self.source.environmental_alerts()
        );

        let mut alerts = self.degrade(AlertCategory::Fall, fall);
        alerts.extend(self.degrade(AlertCategory::Environmental, environmental));
        alerts
    }

    fn degrade(
        &self,
        category: AlertCategory,
        result: Result<Vec<Alert>, AlertError>,
    ) -> Vec<Alert> {
        match result {
            Ok(alerts) => alerts,
            Err(e) => {
                warn!(
                    "Failed to fetch {} alerts from {}: {}",
                    category,
                    self.source.name(),
                    e
                );
                Vec::new()
            }
        }
    }

    async fn dispatch(&self, alert: &Alert) {
        let notification = Notification::for_alert(&self.config.title, alert);
        match self.notifier.dispatch(notification).await {
            Ok(()) => {
                info!(
                    alert_id = alert.id,
                    category = %alert.category,
                    location = alert.location_id.as_deref().unwrap_or("-"),
                    "Dispatched notification via {}",
                    self.notifier.name()
                );
            }
            Err(e) => {
                error!(alert_id = alert.id, "Notification dispatch failed: {}", e);
            }
        }
    }
}

impl<S: AlertSource, N: Notifier> std::fmt::Debug for AlertEngine<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertEngine")
            .field("source", &self.source.name())
            .field("notifier", &self.notifier.name())
            .field("config", &self.config)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
