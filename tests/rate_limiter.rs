use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use refsync::utility::rate_limiter::{RateLimiterConfig, RequestRateLimiter, ThrottleError};

fn config(rpm: u32, queue: usize, delay_ms: u64) -> RateLimiterConfig {
    RateLimiterConfig {
        requests_per_minute: rpm,
        max_queue_size: queue,
        min_request_delay_ms: delay_ms,
    }
}

#[tokio::test(start_paused = true)]
async fn tokens_stay_within_bounds() {
    let limiter = RequestRateLimiter::new(config(60, 50, 0));

    let stats = limiter.get_stats().await;
    assert_eq!(stats.tokens, 60.0);
    assert_eq!(stats.max_tokens, 60);

    // A long idle period must not overfill the bucket.
    tokio::time::sleep(Duration::from_secs(600)).await;
    let stats = limiter.get_stats().await;
    assert!(stats.tokens <= 60.0);
    assert!(stats.tokens >= 0.0);

    // Spending a token leaves the bucket below capacity until refill.
    limiter.throttle(|| async {}).await.unwrap();
    let stats = limiter.get_stats().await;
    assert!(stats.tokens >= 59.0);
    assert!(stats.tokens <= 60.0);
    assert_eq!(stats.total_dispatched, 1);
}

#[tokio::test(start_paused = true)]
async fn higher_priority_dispatches_first() {
    // Spacing serializes the three dispatches so the recorded order is
    // the admission order.
    let limiter = RequestRateLimiter::new(config(600, 50, 100));
    let order: Arc<Mutex<Vec<i32>>> = Arc::new(Mutex::new(Vec::new()));

    let record = |order: Arc<Mutex<Vec<i32>>>, tag: i32| {
        move || async move {
            order.lock().await.push(tag);
        }
    };

    let (a, b, c) = tokio::join!(
        limiter.throttle_with_priority(record(order.clone(), 1), 1),
        limiter.throttle_with_priority(record(order.clone(), 5), 5),
        limiter.throttle_with_priority(record(order.clone(), 3), 3),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    assert_eq!(*order.lock().await, vec![5, 3, 1]);
}

#[tokio::test(start_paused = true)]
async fn equal_priorities_keep_arrival_order() {
    let limiter = RequestRateLimiter::new(config(600, 50, 50));
    let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

    let record = |order: Arc<Mutex<Vec<&'static str>>>, tag: &'static str| {
        move || async move {
            order.lock().await.push(tag);
        }
    };

    let (a, b) = tokio::join!(
        limiter.throttle_with_priority(record(order.clone(), "first"), 7),
        limiter.throttle_with_priority(record(order.clone(), "second"), 7),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(*order.lock().await, vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn sustained_rate_is_enforced() {
    // Capacity 60: the 61st admission must wait for a refill, which at
    // 60 requests/minute means about one second after the burst.
    let limiter = RequestRateLimiter::new(config(60, 200, 0));

    let calls: Vec<_> = (0..61)
        .map(|_| {
            let limiter = limiter.clone();
            async move { limiter.throttle(|| async { Instant::now() }).await.unwrap() }
        })
        .collect();

    let times = futures::future::join_all(calls).await;

    let burst_spread = times[59].duration_since(times[0]);
    assert!(burst_spread < Duration::from_millis(100));

    let refill_wait = times[60].duration_since(times[0]);
    assert!(refill_wait >= Duration::from_millis(900));
    assert!(refill_wait <= Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn overflowing_queue_rejects_immediately() {
    let limiter = RequestRateLimiter::new(config(60, 2, 0));

    let (a, b, c) = tokio::join!(
        limiter.throttle(|| async { "a" }),
        limiter.throttle(|| async { "b" }),
        limiter.throttle(|| async { "c" }),
    );

    assert_eq!(a.unwrap(), "a");
    assert_eq!(b.unwrap(), "b");
    assert!(matches!(c, Err(ThrottleError::QueueFull { size: 2 })));

    let stats = limiter.get_stats().await;
    assert_eq!(stats.total_rejected, 1);
    assert_eq!(stats.total_dispatched, 2);
}

#[tokio::test(start_paused = true)]
async fn minimum_spacing_is_enforced() {
    let limiter = RequestRateLimiter::new(config(600, 50, 100));

    let calls: Vec<_> = (0..3)
        .map(|_| {
            let limiter = limiter.clone();
            async move { limiter.throttle(|| async { Instant::now() }).await.unwrap() }
        })
        .collect();

    let times = futures::future::join_all(calls).await;

    assert!(times[1].duration_since(times[0]) >= Duration::from_millis(100));
    assert!(times[2].duration_since(times[1]) >= Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn server_pressure_clamps_tokens() {
    let limiter = RequestRateLimiter::new(config(100, 50, 0));

    // Remaining below 10% of the server limit: clamp down to remaining.
    limiter.update_from_headers(100, 5, 1_700_000_000).await;
    let stats = limiter.get_stats().await;
    assert!(stats.tokens <= 5.0);

    // A higher remaining value never raises the local count back up.
    limiter.update_from_headers(100, 9, 1_700_000_000).await;
    let stats = limiter.get_stats().await;
    assert!(stats.tokens <= 5.0);
}

#[tokio::test(start_paused = true)]
async fn plentiful_server_capacity_leaves_tokens_alone() {
    let limiter = RequestRateLimiter::new(config(100, 50, 0));

    limiter.update_from_headers(100, 50, 1_700_000_000).await;
    let stats = limiter.get_stats().await;
    assert_eq!(stats.tokens, 100.0);
}

#[tokio::test(start_paused = true)]
async fn reset_settles_queued_waiters() {
    // Long spacing keeps the second request queued behind the first.
    let limiter = RequestRateLimiter::new(config(60, 10, 60_000));

    let first = tokio::spawn({
        let limiter = limiter.clone();
        async move { limiter.throttle(|| async { 1 }).await }
    });
    tokio::time::sleep(Duration::from_millis(1)).await;

    let second = tokio::spawn({
        let limiter = limiter.clone();
        async move { limiter.throttle(|| async { 2 }).await }
    });
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert_eq!(limiter.queue_size().await, 1);
    limiter.reset().await;

    assert_eq!(first.await.unwrap(), Ok(1));
    assert_eq!(second.await.unwrap(), Err(ThrottleError::Cancelled));

    let stats = limiter.get_stats().await;
    assert_eq!(stats.queue_size, 0);
    assert_eq!(stats.tokens, 60.0);
}

#[tokio::test(start_paused = true)]
async fn throttled_state_is_observable() {
    let limiter = RequestRateLimiter::new(config(60, 50, 0));
    assert!(!limiter.is_throttled().await);

    // Drain the bucket.
    for _ in 0..60 {
        limiter.throttle(|| async {}).await.unwrap();
    }
    assert!(limiter.is_throttled().await);

    // One second refills one token at 60 requests/minute.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(!limiter.is_throttled().await);
}
