use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use refsync::utility::deduplicator::RequestDeduplicator;

fn counting_supplier(
    invocations: Arc<AtomicUsize>,
    payload: &str,
    delay_ms: u64,
) -> impl FnOnce() -> BoxFuture<'static, Result<String, String>> {
    let payload = payload.to_string();
    move || {
        async move {
            invocations.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(payload)
        }
        .boxed()
    }
}

fn failing_supplier(
    invocations: Arc<AtomicUsize>,
    message: &str,
) -> impl FnOnce() -> BoxFuture<'static, Result<String, String>> {
    let message = message.to_string();
    move || {
        async move {
            invocations.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(message)
        }
        .boxed()
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_share_one_operation() {
    let dedup: RequestDeduplicator<Result<String, String>> = RequestDeduplicator::new();
    let invocations = Arc::new(AtomicUsize::new(0));

    let (a, b, c) = tokio::join!(
        dedup.dedupe(
            "projects:list",
            counting_supplier(invocations.clone(), "payload", 50)
        ),
        dedup.dedupe(
            "projects:list",
            counting_supplier(invocations.clone(), "other", 50)
        ),
        dedup.dedupe(
            "projects:list",
            counting_supplier(invocations.clone(), "third", 50)
        ),
    );

    // One supplier invocation, one settlement, fanned out to everyone.
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    assert_eq!(a, Ok("payload".to_string()));
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[tokio::test(start_paused = true)]
async fn settled_keys_start_fresh() {
    let dedup: RequestDeduplicator<Result<String, String>> = RequestDeduplicator::new();
    let invocations = Arc::new(AtomicUsize::new(0));

    let first = dedup
        .dedupe(
            "categories:42",
            counting_supplier(invocations.clone(), "a", 10),
        )
        .await;
    assert_eq!(first, Ok("a".to_string()));
    assert!(!dedup.is_pending("categories:42").await);

    let second = dedup
        .dedupe(
            "categories:42",
            counting_supplier(invocations.clone(), "b", 10),
        )
        .await;
    assert_eq!(second, Ok("b".to_string()));
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn failures_fan_out_and_do_not_stick() {
    let dedup: RequestDeduplicator<Result<String, String>> = RequestDeduplicator::new();
    let invocations = Arc::new(AtomicUsize::new(0));

    let (a, b) = tokio::join!(
        dedup.dedupe("projects:list", failing_supplier(invocations.clone(), "boom")),
        dedup.dedupe("projects:list", failing_supplier(invocations.clone(), "boom")),
    );

    assert_eq!(a, Err("boom".to_string()));
    assert_eq!(a, b);
    assert_eq!(invocations.load(Ordering::SeqCst), 1);

    // The entry is gone, so the next call retries fresh.
    assert!(!dedup.is_pending("projects:list").await);
    let retry = dedup
        .dedupe("projects:list", failing_supplier(invocations.clone(), "boom"))
        .await;
    assert_eq!(retry, Err("boom".to_string()));
    assert_eq!(invocations.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn introspection_reports_pending_state() {
    let dedup = Arc::new(RequestDeduplicator::<Result<String, String>>::new());
    let invocations = Arc::new(AtomicUsize::new(0));

    assert_eq!(dedup.pending_count().await, 0);
    assert_eq!(dedup.waiter_count("projects:1").await, None);

    let first = tokio::spawn({
        let dedup = Arc::clone(&dedup);
        let supplier = counting_supplier(invocations.clone(), "v", 100);
        async move { dedup.dedupe("projects:1", supplier).await }
    });
    let second = tokio::spawn({
        let dedup = Arc::clone(&dedup);
        let supplier = counting_supplier(invocations.clone(), "v", 100);
        async move { dedup.dedupe("projects:1", supplier).await }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(dedup.is_pending("projects:1").await);
    assert_eq!(dedup.pending_count().await, 1);
    assert_eq!(dedup.waiter_count("projects:1").await, Some(2));

    let (a, b) = (first.await.unwrap(), second.await.unwrap());
    assert_eq!(a, b);
    assert_eq!(dedup.pending_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn clear_forgets_without_cancelling_in_flight_work() {
    let dedup = Arc::new(RequestDeduplicator::<Result<String, String>>::new());
    let invocations = Arc::new(AtomicUsize::new(0));

    let old = tokio::spawn({
        let dedup = Arc::clone(&dedup);
        let supplier = counting_supplier(invocations.clone(), "old", 100);
        async move { dedup.dedupe("projects:list", supplier).await }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(dedup.is_pending("projects:list").await);

    dedup.clear().await;
    assert_eq!(dedup.pending_count().await, 0);

    // A fresh registration under the same key while the old operation is
    // still running.
    let fresh = tokio::spawn({
        let dedup = Arc::clone(&dedup);
        let supplier = counting_supplier(invocations.clone(), "fresh", 500);
        async move { dedup.dedupe("projects:list", supplier).await }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(dedup.is_pending("projects:list").await);
    assert_eq!(invocations.load(Ordering::SeqCst), 2);

    // The old operation settles without evicting the fresh registration.
    assert_eq!(old.await.unwrap(), Ok("old".to_string()));
    assert!(dedup.is_pending("projects:list").await);

    assert_eq!(fresh.await.unwrap(), Ok("fresh".to_string()));
    assert!(!dedup.is_pending("projects:list").await);
}
