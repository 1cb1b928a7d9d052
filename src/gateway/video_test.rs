use std::sync::Arc;

use super::*;
use crate::gateway::mock::{MockApi, fast_poll};

fn pending() -> VideoOperation {
    VideoOperation { name: "op".into(), ..VideoOperation::default() }
}

#[tokio::test]
async fn already_done_returns_without_polling() {
    let api = MockApi::new();
    let done = VideoOperation { done: true, ..pending() };
    let op = wait_for_completion(&api, done, &fast_poll(), &CancellationToken::new()).await.unwrap();
    assert!(op.done);
    assert_eq!(api.poll_count(), 0);
}

#[tokio::test]
async fn returns_only_after_done_signal() {
    let api = MockApi::new().video_done_after(Some(4));
    let op = wait_for_completion(&api, pending(), &fast_poll(), &CancellationToken::new()).await.unwrap();
    assert!(op.done);
    assert_eq!(api.poll_count(), 4);
    assert!(op.video_uri.is_some());
}

#[tokio::test]
async fn never_done_times_out() {
    let api = MockApi::new().video_done_after(None);
    let policy = PollPolicy { timeout: Duration::from_millis(20), ..fast_poll() };
    let err = wait_for_completion(&api, pending(), &policy, &CancellationToken::new()).await.unwrap_err();
    assert_eq!(err, GatewayError::VideoTimedOut { secs: 0 });
}

#[tokio::test]
async fn cancel_stops_polling() {
    let api = Arc::new(MockApi::new().video_done_after(None));
    let policy = PollPolicy { timeout: Duration::from_secs(30), ..fast_poll() };
    let cancel = CancellationToken::new();

    let task = {
        let api = api.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { wait_for_completion(api.as_ref(), pending(), &policy, &cancel).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();
    let err = task.await.unwrap().unwrap_err();
    assert_eq!(err, GatewayError::Cancelled);
    let polls_at_cancel = api.poll_count();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(api.poll_count(), polls_at_cancel);
}

#[tokio::test]
async fn pre_cancelled_token_never_polls() {
    let api = MockApi::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = wait_for_completion(&api, pending(), &fast_poll(), &cancel).await.unwrap_err();
    assert_eq!(err, GatewayError::Cancelled);
    assert_eq!(api.poll_count(), 0);
}

#[test]
fn backoff_grows_to_cap() {
    let policy = PollPolicy {
        interval: Duration::from_secs(2),
        max_interval: Duration::from_secs(5),
        backoff: 2.0,
        timeout: Duration::from_secs(60),
    };
    assert_eq!(policy.next_interval(Duration::from_secs(2)), Duration::from_secs(4));
    assert_eq!(policy.next_interval(Duration::from_secs(4)), Duration::from_secs(5));
}

#[test]
fn fixed_interval_by_default() {
    let policy = PollPolicy::default();
    assert_eq!(policy.interval, Duration::from_secs(5));
    assert_eq!(policy.next_interval(policy.interval), Duration::from_secs(5));
}

#[test]
fn huge_backoff_saturates_at_cap() {
    let policy = PollPolicy { backoff: 1e20, ..PollPolicy::default() };
    assert_eq!(policy.next_interval(Duration::from_secs(5)), Duration::from_secs(5));
    let unbounded = PollPolicy { backoff: f64::MAX, max_interval: Duration::MAX, ..PollPolicy::default() };
    assert_eq!(unbounded.next_interval(Duration::from_secs(5)), Duration::MAX);
}

#[tokio::test]
async fn huge_backoff_still_completes() {
    let api = MockApi::new().video_done_after(Some(3));
    let policy = PollPolicy { backoff: 1e20, ..fast_poll() };
    let op = wait_for_completion(&api, pending(), &policy, &CancellationToken::new()).await.unwrap();
    assert!(op.done);
    assert_eq!(api.poll_count(), 3);
}
