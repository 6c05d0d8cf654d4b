//! Contract Test: Tracker Lifecycle
//!
//! This test verifies lifecycle and failure-delegation behavior:
//! - Stopping the tracker wakes blocked waiters with a cancellation,
//!   never a silent "no leader"
//! - Losing the watch invokes the abort handler exactly once and cancels
//!   waiters; the tracker itself attempts no recovery
//! - start() is one-shot
//! - Tracker events report observations in order
//!
//! If these tests fail, someone has conflated cancellation with timeout,
//! or added recovery logic that belongs to the session.

mod common;

use common::*;
use leaderwatch_core::traits::LogAbort;
use leaderwatch_core::{Error, LeaderCache, NodeTracker, TrackerEvent};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn stop_wakes_blocked_waiters_with_a_cancellation() {
    let session = Arc::new(ControlledSession::new());
    let (tracker, _events) = NodeTracker::new(watch_config(), Arc::new(LogAbort)).unwrap();
    let tracker = Arc::new(tracker);
    tracker.start(session.clone()).await.unwrap();

    let cache = Arc::new(LeaderCache::new(tracker.clone()));
    let waiter = tokio::spawn({
        let cache = cache.clone();
        async move { cache.wait_for_address(Duration::ZERO).await }
    });

    // let the waiter block first
    tokio::time::sleep(Duration::from_millis(50)).await;
    tracker.stop().await;

    let outcome = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("stop must wake the waiter")
        .unwrap();

    let err = outcome.expect_err("cancellation must not be reported as a value or timeout");
    assert!(err.is_cancelled(), "expected a cancellation, got {err}");
}

#[tokio::test]
async fn watch_loss_invokes_the_abort_handler() {
    let session = Arc::new(ControlledSession::new());
    let abort = Arc::new(CountingAbort::new());

    let (tracker, _events) = NodeTracker::new(watch_config(), abort.clone()).unwrap();
    let tracker = Arc::new(tracker);
    tracker.start(session.clone()).await.unwrap();

    let cache = Arc::new(LeaderCache::new(tracker.clone()));
    let waiter = tokio::spawn({
        let cache = cache.clone();
        async move { cache.wait_for_address(Duration::ZERO).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    session.lose_watch();

    // the waiter is cancelled, not left hanging and not handed a timeout
    let outcome = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("watch loss must wake the waiter")
        .unwrap();
    assert!(outcome.is_err_and(|e| e.is_cancelled()));

    // failure is delegated out-of-band, exactly once
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(abort.count(), 1);
    let reason = abort.last().expect("abort reason recorded");
    assert!(reason.contains("watch lost"), "unexpected reason: {reason}");
}

#[tokio::test]
async fn start_twice_is_rejected() {
    let session = Arc::new(ControlledSession::new());
    let (tracker, _events) = NodeTracker::new(watch_config(), Arc::new(LogAbort)).unwrap();
    let tracker = Arc::new(tracker);

    tracker.start(session.clone()).await.unwrap();

    let second = Arc::new(ControlledSession::new());
    let outcome = tracker.start(second).await;
    assert!(matches!(outcome, Err(Error::Tracker(_))));
}

#[tokio::test]
async fn seeding_reads_the_node_exactly_once() {
    let session = Arc::new(ControlledSession::with_value(b"10.0.0.5:60000"));
    let (tracker, _events) = NodeTracker::new(watch_config(), Arc::new(LogAbort)).unwrap();
    let tracker = Arc::new(tracker);
    tracker.start(session.clone()).await.unwrap();

    // reads beyond the seeding read would mean the tracker is polling
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        session.read_call_count(),
        1,
        "read() should be called exactly once at startup"
    );
}

async fn next_event(events: &mut tokio::sync::mpsc::Receiver<TrackerEvent>) -> TrackerEvent {
    tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("event must arrive")
        .expect("event channel must stay open")
}

#[tokio::test]
async fn tracker_events_report_observations_in_order() {
    let session = Arc::new(ControlledSession::new());
    let (tracker, mut events) = NodeTracker::new(watch_config(), Arc::new(LogAbort)).unwrap();
    let tracker = Arc::new(tracker);
    tracker.start(session.clone()).await.unwrap();

    assert_eq!(
        next_event(&mut events).await,
        TrackerEvent::Started {
            path: "/cluster/leader".to_string()
        }
    );

    session.set(b"10.0.0.5:60000");
    assert_eq!(
        next_event(&mut events).await,
        TrackerEvent::ValueObserved {
            path: "/cluster/leader".to_string(),
            bytes: b"10.0.0.5:60000".len()
        }
    );

    session.delete();
    assert_eq!(
        next_event(&mut events).await,
        TrackerEvent::ValueCleared {
            path: "/cluster/leader".to_string()
        }
    );

    tracker.stop().await;
    assert_eq!(
        next_event(&mut events).await,
        TrackerEvent::Stopped {
            path: "/cluster/leader".to_string()
        }
    );
}
