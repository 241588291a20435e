//! Fixed-interval polling around an [`AlertEngine`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alert_core::{AlertSource, CurrentAlerts, Notifier};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::engine::{AlertEngine, PollResult};

/// Drives an engine: one poll immediately, then one per interval.
pub struct Poller<S: AlertSource, N: Notifier> {
    engine: Arc<AlertEngine<S, N>>,
    interval: Duration,
}

impl<S, N> Poller<S, N>
where
    S: AlertSource + 'static,
    N: Notifier + 'static,
{
    /// Create a poller using the engine's configured interval.
    pub fn new(engine: Arc<AlertEngine<S, N>>) -> Self {
        let interval = engine.config().poll_interval;
        Self::with_interval(engine, interval)
    }

    /// Create a poller with an explicit interval (at least 1 ms).
    pub fn with_interval(engine: Arc<AlertEngine<S, N>>, interval: Duration) -> Self {
        Self {
            engine,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn engine(&self) -> &Arc<AlertEngine<S, N>> {
        &self.engine
    }

    /// Run in a background task.
    pub fn spawn(self) -> PollerHandle {
        let (tx, rx) = watch::channel(None);
        let cancel = self.engine.cancel_token();
        let task = tokio::spawn(async move { self.run_loop(tx).await });

        PollerHandle {
            cancel,
            task,
            updates: rx,
        }
    }

    /// Run inline until `shutdown_signal` completes or the engine is shut
    /// down elsewhere.
    ///
    /// # Example
    ///
    /// ```ignore
    /// poller.run_with_shutdown(async {
    ///     let _ = tokio::signal::ctrl_c().await;
    /// }).await;
    /// ```
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F)
    where
        F: Future<Output = ()> + Send,
    {
        let (tx, _rx) = watch::channel(None);
        tokio::pin!(shutdown_signal);

        tokio::select! {
            biased;

            () = &mut shutdown_signal => {
                info!("Shutdown signal received, stopping alert poller");
                self.engine.shutdown();
            }

            () = self.run_loop(tx) => {}
        }
    }

    async fn run_loop(&self, updates: watch::Sender<Option<CurrentAlerts>>) {
        info!(
            "Starting alert poller (source: {}, interval: {:?})",
            self.engine.source().name(),
            self.interval
        );

        let cancel = self.engine.cancel_token();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.engine.poll().await {
                PollResult::Refreshed(view) => {
                    debug!(shown = view.items.len(), "Publishing refreshed alerts");
                    updates.send_replace(Some(view));
                }
                PollResult::Cancelled => break,
                PollResult::Busy => {}
            }
        }

        info!("Alert poller stopped");
    }
}

/// Handle to a spawned poller.
#[derive(Debug)]
pub struct PollerHandle {
    cancel: CancelToken,
    task: JoinHandle<()>,
    updates: watch::Receiver<Option<CurrentAlerts>>,
}

impl PollerHandle {
    /// Receive every refreshed view.
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentAlerts>> {
        self.updates.clone()
    }

    /// The most recently published view.
    pub fn latest(&self) -> Option<CurrentAlerts> {
        self.updates.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the session and wait for the poll task to exit.
    ///
    /// Once this returns, no further notification is dispatched.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!("Alert poller task ended abnormally: {}", e);
        }
    }
}
