//! Behavioral tests for the alert engine and poller.
//!
//! All collaborators are in-memory, so these run without a backend:
//!   cargo test -p alert-engine --test engine_properties

use std::sync::Arc;
use std::time::Duration;

use alert_engine::{
    Ack, Alert, AlertCategory, AlertEngine, DispatchPolicy, EngineConfig, EngineError, PollResult,
    Poller,
};
use chrono::{DateTime, TimeZone, Utc};
use mock_alerts::{DelayedNotifier, DelayedSource, RecordingNotifier, StaticSource};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
}

fn setup(
    config: EngineConfig,
) -> (
    StaticSource,
    RecordingNotifier,
    AlertEngine<StaticSource, RecordingNotifier>,
) {
    init_tracing();
    let source = StaticSource::new();
    let notifier = RecordingNotifier::new();
    let engine = AlertEngine::new(source.clone(), notifier.clone(), config);
    (source, notifier, engine)
}

async fn poll_view(engine: &AlertEngine<StaticSource, RecordingNotifier>) -> Vec<i64> {
    match engine.poll().await {
        PollResult::Refreshed(view) => view.ids(),
        other => panic!("expected a refreshed view, got {:?}", other),
    }
}

// ============================================================================
// Selection
// ============================================================================

mod selection_tests {
    use super::*;

    #[tokio::test]
    async fn test_at_most_two_alerts_surfaced() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        let mut alerts: Vec<Alert> = (1..=20)
            .map(|id| Alert::fall(id, "fall", "101").observed(at(id as u32 % 24)))
            .collect();
        alerts.extend((0..15).map(|i| Alert::environmental(1000 + i, "env", "201")));
        source.set_alerts(alerts);

        let ids = poll_view(&engine).await;
        assert_eq!(ids.len(), 2);
        assert_eq!(notifier.count(), 2);
    }

    #[tokio::test]
    async fn test_latest_fall_wins() {
        let (source, _notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![
            Alert::fall(1, "t1", "101").observed(at(1)),
            Alert::fall(3, "t3", "103").observed(at(3)),
            Alert::fall(2, "t2", "102").observed(at(2)),
        ]);

        assert_eq!(poll_view(&engine).await, vec![3]);
    }

    #[tokio::test]
    async fn test_undated_loses_to_dated() {
        let (source, _notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![
            Alert::fall(1, "undated", "101"),
            Alert::fall(2, "dated", "102").observed(at(1)),
        ]);

        assert_eq!(poll_view(&engine).await, vec![2]);
    }

    #[tokio::test]
    async fn test_location_scope_returns_single_room_alert() {
        let (source, notifier, engine) = setup(EngineConfig::for_location("203"));
        source.set_alerts(vec![
            Alert::fall(1, "fall 203", "203").observed(at(4)),
            Alert::fall(2, "fall 204", "204").observed(at(9)),
            Alert::environmental(1000, "env 203", "203"),
        ]);

        assert_eq!(poll_view(&engine).await, vec![1]);
        assert_eq!(notifier.sent_ids(), vec![1]);
    }
}

// ============================================================================
// Dispatch policy
// ============================================================================

mod dispatch_tests {
    use super::*;

    #[tokio::test]
    async fn test_concrete_scenario() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_alerts(vec![
            Alert::fall(1, "🚨 Room 101 - fall detected", "101").observed(
                DateTime::parse_from_rfc3339("2025-01-01T10:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
            Alert::environmental(1000, "env", "203"),
        ]);

        let view = engine.poll().await.into_view().unwrap();
        assert_eq!(view.ids(), vec![1, 1000]);
        assert_eq!(view.dispatched, vec![1, 1000]);
        assert_eq!(notifier.sent_ids(), vec![1, 1000]);

        let sent = notifier.sent();
        assert_eq!(sent[1].payload.category, AlertCategory::Environmental);
        assert_eq!(sent[1].payload.location_id.as_deref(), Some("203"));

        let state = engine.dispatch_state().await;
        assert_eq!(state.len(), 2);
        assert!(state.contains(1) && state.contains(1000));
    }

    #[tokio::test]
    async fn test_no_duplicate_notification_for_unchanged_input() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_alerts(vec![
            Alert::fall(1, "fall", "101"),
            Alert::environmental(1000, "env", "201"),
        ]);

        engine.poll().await;
        assert_eq!(notifier.count(), 2);

        let second = engine.poll().await.into_view().unwrap();
        assert!(second.dispatched.is_empty());
        assert_eq!(second.items.len(), 2);
        assert_eq!(notifier.count(), 2);
    }

    #[tokio::test]
    async fn test_replace_policy_renotifies_after_disappearance() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        let alert_a = Alert::fall(1, "A", "101");

        source.set_fall(vec![alert_a.clone()]);
        engine.poll().await;
        assert_eq!(notifier.sent_ids(), vec![1]);

        source.clear();
        engine.poll().await;
        assert_eq!(notifier.count(), 1);
        assert!(!engine.dispatch_state().await.contains(1));

        source.set_fall(vec![alert_a]);
        engine.poll().await;
        assert_eq!(notifier.sent_ids(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_union_policy_does_not_renotify() {
        let (source, notifier, engine) =
            setup(EngineConfig::default().with_policy(DispatchPolicy::Union));
        let alert_a = Alert::fall(1, "A", "101");

        source.set_fall(vec![alert_a.clone()]);
        engine.poll().await;
        source.clear();
        engine.poll().await;
        source.set_fall(vec![alert_a]);
        engine.poll().await;

        assert_eq!(notifier.sent_ids(), vec![1]);
        assert!(engine.dispatch_state().await.contains(1));
    }

    #[tokio::test]
    async fn test_new_alert_replacing_old_one_is_notified() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![Alert::fall(1, "first", "101").observed(at(1))]);
        engine.poll().await;

        source.set_fall(vec![
            Alert::fall(1, "first", "101").observed(at(1)),
            Alert::fall(2, "second", "102").observed(at(2)),
        ]);
        let view = engine.poll().await.into_view().unwrap();

        assert_eq!(view.ids(), vec![2]);
        assert_eq!(notifier.sent_ids(), vec![1, 2]);
    }
}

// ============================================================================
// Source failures
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_partial_source_failure() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![Alert::fall(1, "fall", "101")]);
        source.fail_environmental(true);

        assert_eq!(poll_view(&engine).await, vec![1]);
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_total_source_failure_is_empty_view() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![Alert::fall(1, "fall", "101")]);
        source.fail_fall(true);
        source.fail_environmental(true);

        assert!(poll_view(&engine).await.is_empty());
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_alert_passes_through() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        let mut blank = Alert::fall(5, "", "x");
        blank.location_id = None;
        source.set_fall(vec![blank]);

        assert_eq!(poll_view(&engine).await, vec![5]);
        let sent = notifier.sent();
        assert_eq!(sent[0].body, "");
        assert!(sent[0].payload.location_id.is_none());
    }
}

// ============================================================================
// Confirmation
// ============================================================================

mod confirm_tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_fall_goes_to_source() {
        let (source, _notifier, engine) = setup(EngineConfig::default());
        source.set_alerts(vec![
            Alert::fall(1, "fall", "101"),
            Alert::environmental(1000, "env", "201"),
        ]);
        engine.poll().await;

        assert_eq!(engine.confirm(1).await.unwrap(), Ack::Confirmed);
        assert_eq!(source.confirmed(), vec![1]);
        assert_eq!(engine.current().await.unwrap().ids(), vec![1000]);

        // The source no longer reports it, so the next view stays without it.
        assert_eq!(poll_view(&engine).await, vec![1000]);
    }

    #[tokio::test]
    async fn test_confirm_environmental_is_local() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_environmental(vec![Alert::environmental(1000, "env", "201")]);
        engine.poll().await;

        assert_eq!(engine.confirm(1000).await.unwrap(), Ack::Dismissed);
        assert!(source.confirmed().is_empty());
        assert!(engine.current().await.unwrap().is_empty());

        // Still active on the source: it comes back, without a new notification.
        assert_eq!(poll_view(&engine).await, vec![1000]);
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_confirm_unknown_id_uses_offset_convention() {
        let (source, _notifier, engine) = setup(EngineConfig::default());

        assert_eq!(engine.confirm(42).await.unwrap(), Ack::Confirmed);
        assert_eq!(engine.confirm(1042).await.unwrap(), Ack::Dismissed);
        assert_eq!(source.confirmed(), vec![42]);
    }

    #[tokio::test]
    async fn test_confirm_failure_propagates() {
        let (source, _notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![Alert::fall(1, "fall", "101")]);
        engine.poll().await;
        source.fail_confirm(true);

        let result = engine.confirm(1).await;
        assert!(matches!(result, Err(EngineError::Source(_))));
        assert_eq!(engine.current().await.unwrap().ids(), vec![1]);
    }
}

// ============================================================================
// Concurrency and cancellation
// ============================================================================

mod lifecycle_tests {
    use super::*;

    type SlowEngine = AlertEngine<DelayedSource<StaticSource>, RecordingNotifier>;

    fn slow_engine(delay_ms: u64) -> (StaticSource, RecordingNotifier, Arc<SlowEngine>) {
        init_tracing();
        let source = StaticSource::with_alerts(vec![Alert::fall(1, "fall", "101")]);
        let notifier = RecordingNotifier::new();
        let engine = AlertEngine::with_defaults(
            DelayedSource::with_millis(source.clone(), delay_ms),
            notifier.clone(),
        );
        (source, notifier, Arc::new(engine))
    }

    #[tokio::test]
    async fn test_shutdown_during_fetch_discards_poll() {
        let (_source, notifier, engine) = slow_engine(200);

        let in_flight = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.poll().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        engine.shutdown();

        assert_eq!(in_flight.await.unwrap(), PollResult::Cancelled);
        assert_eq!(notifier.count(), 0);
        assert!(engine.dispatch_state().await.is_empty());
        assert!(engine.current().await.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_during_dispatch_discards_poll() {
        init_tracing();
        let source = StaticSource::with_alerts(vec![
            Alert::fall(1, "fall", "101"),
            Alert::environmental(1000, "env", "201"),
        ]);
        let recorder = RecordingNotifier::new();
        let engine = Arc::new(AlertEngine::with_defaults(
            source,
            DelayedNotifier::with_millis(recorder.clone(), 100),
        ));

        let in_flight = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.poll().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        engine.shutdown();

        assert_eq!(in_flight.await.unwrap(), PollResult::Cancelled);
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(recorder.count(), 0);
        assert!(engine.dispatch_state().await.is_empty());
        assert!(engine.current().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_during_dispatch_sends_nothing_afterwards() {
        init_tracing();
        let source = StaticSource::with_alerts(vec![
            Alert::fall(1, "fall", "101"),
            Alert::environmental(1000, "env", "201"),
        ]);
        let recorder = RecordingNotifier::new();
        let engine = Arc::new(AlertEngine::with_defaults(
            source,
            DelayedNotifier::with_millis(recorder.clone(), 80),
        ));

        let handle = Poller::with_interval(engine.clone(), Duration::from_secs(60)).spawn();
        // Second dispatch of the first cycle is in flight.
        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.stop().await;

        let sent_at_stop = recorder.count();
        assert!(sent_at_stop <= 1);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(recorder.count(), sent_at_stop);
        assert!(engine.dispatch_state().await.is_empty());
    }

    #[tokio::test]
    async fn test_try_poll_reports_busy() {
        let (_source, notifier, engine) = slow_engine(150);

        let first = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.poll().await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(engine.try_poll().await, PollResult::Busy);
        assert!(matches!(first.await.unwrap(), PollResult::Refreshed(_)));
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_polls_are_serialized() {
        let (_source, notifier, engine) = slow_engine(50);

        let (a, b) = tokio::join!(engine.poll(), engine.poll());
        let dispatched: usize = [a, b]
            .into_iter()
            .filter_map(PollResult::into_view)
            .map(|view| view.dispatched.len())
            .sum();

        assert_eq!(dispatched, 1);
        assert_eq!(notifier.sent_ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_poller_polls_eagerly_and_on_interval() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![Alert::fall(1, "fall", "101")]);
        let engine = Arc::new(engine);

        let handle = Poller::with_interval(engine.clone(), Duration::from_millis(40)).spawn();
        let mut updates = handle.subscribe();

        tokio::time::timeout(Duration::from_secs(1), updates.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notifier.sent_ids(), vec![1]);

        source.set_environmental(vec![Alert::environmental(1000, "env", "201")]);
        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                updates.changed().await.unwrap();
                let latest = updates.borrow_and_update().clone();
                if latest.map(|v| v.items.len()) == Some(2) {
                    break;
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(notifier.sent_ids(), vec![1, 1000]);
        assert_eq!(handle.latest().unwrap().ids(), vec![1, 1000]);

        handle.stop().await;
        assert!(engine.is_shut_down());

        source.set_fall(vec![Alert::fall(2, "after stop", "102")]);
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(notifier.count(), 2);
    }

    #[tokio::test]
    async fn test_run_with_shutdown_stops_on_signal() {
        let (source, notifier, engine) = setup(EngineConfig::default());
        source.set_fall(vec![Alert::fall(1, "fall", "101")]);
        let engine = Arc::new(engine);

        let poller = Poller::with_interval(engine.clone(), Duration::from_millis(20));
        tokio::time::timeout(
            Duration::from_secs(1),
            poller.run_with_shutdown(tokio::time::sleep(Duration::from_millis(70))),
        )
        .await
        .unwrap();

        assert!(engine.is_shut_down());
        assert_eq!(notifier.count(), 1);
    }
}
