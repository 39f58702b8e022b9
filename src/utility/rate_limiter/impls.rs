// Standard library
use std::future::Future;
use std::mem;
use std::sync::Arc;

// 3rd party crates
use tokio::sync::{oneshot, Mutex, Notify};
use tokio::time::{sleep, Duration, Instant};
use tracing::{trace, warn};

// Current module imports
use super::constants::{REFILL_WINDOW_MS, SERVER_PRESSURE_RATIO, STALE_WAIT_WARN_MS};
use super::errors::ThrottleError;
use super::types::{
    LimiterInner, LimiterState, QueuedRequest, RateLimiterConfig, RateLimiterStats,
    RequestRateLimiter,
};

/// Next step decided by the drainer under the state lock.
enum DrainStep {
    Wait(Duration),
    Dispatch(QueuedRequest),
    Idle,
}

impl RequestRateLimiter {
    /// Create a new rate limiter with a full bucket.
    pub fn new(config: RateLimiterConfig) -> Self {
        let tokens: f64 = f64::from(config.requests_per_minute);
        Self {
            inner: Arc::new(LimiterInner {
                config,
                state: Mutex::new(LimiterState {
                    tokens,
                    last_refill: Instant::now(),
                    last_dispatch: None,
                    queue: Vec::new(),
                    processing: false,
                    total_dispatched: 0,
                    total_rejected: 0,
                }),
                wakeup: Notify::new(),
            }),
        }
    }

    /// Runs `operation` once admission control allows it, at priority 0.
    pub async fn throttle<F, Fut, T>(&self, operation: F) -> Result<T, ThrottleError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.throttle_with_priority(operation, 0).await
    }

    /// Runs `operation` once admission control allows it.
    ///
    /// Higher priorities are admitted first; equal priorities keep their
    /// arrival order. Fails immediately with `QueueFull` when the wait
    /// queue is at capacity — the caller decides whether to retry. The
    /// operation's own output passes through unchanged.
    pub async fn throttle_with_priority<F, Fut, T>(
        &self,
        operation: F,
        priority: i32,
    ) -> Result<T, ThrottleError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let permit_rx = self.enqueue(priority).await?;

        match permit_rx.await {
            Ok(Ok(())) => Ok(operation().await),
            Ok(Err(e)) => Err(e),
            // The drainer never drops a waiter without settling it; treat
            // a lost sender as a cancellation all the same.
            Err(_) => Err(ThrottleError::Cancelled),
        }
    }

    async fn enqueue(
        &self,
        priority: i32,
    ) -> Result<oneshot::Receiver<Result<(), ThrottleError>>, ThrottleError> {
        let mut state = self.inner.state.lock().await;

        if state.queue.len() >= self.inner.config.max_queue_size {
            state.total_rejected += 1;
            warn!(
                queue = state.queue.len(),
                capacity = self.inner.config.max_queue_size,
                "rejecting request, wait queue is full"
            );
            return Err(ThrottleError::QueueFull {
                size: state.queue.len(),
            });
        }

        let (permit_tx, permit_rx) = oneshot::channel();
        state.queue.push(QueuedRequest {
            priority,
            enqueued_at: Instant::now(),
            permit_tx,
        });
        trace!(priority, queue = state.queue.len(), "request enqueued");

        if !state.processing {
            state.processing = true;
            tokio::spawn(drain(Arc::clone(&self.inner)));
        } else {
            self.inner.wakeup.notify_one();
        }

        Ok(permit_rx)
    }

    /// Reacts to server-reported rate-limit headers: when the remaining
    /// capacity drops below 10% of the server's limit, the local token
    /// count is clamped down to at most `remaining`. Local tokens are
    /// never increased here.
    pub async fn update_from_headers(&self, limit: u32, remaining: u32, reset: u64) {
        if limit == 0 {
            return;
        }

        let mut state = self.inner.state.lock().await;
        if f64::from(remaining) < f64::from(limit) * SERVER_PRESSURE_RATIO {
            let clamped: f64 = state.tokens.min(f64::from(remaining));
            if clamped < state.tokens {
                warn!(
                    limit,
                    remaining, reset, "server reports low remaining quota, clamping local tokens"
                );
                state.tokens = clamped;
            }
        }
    }

    /// Whether a new request would have to wait right now.
    pub async fn is_throttled(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        state.refill(&self.inner.config);
        state.tokens < 1.0 || !state.queue.is_empty()
    }

    pub async fn queue_size(&self) -> usize {
        self.inner.state.lock().await.queue.len()
    }

    pub async fn get_stats(&self) -> RateLimiterStats {
        let mut state = self.inner.state.lock().await;
        state.refill(&self.inner.config);
        RateLimiterStats {
            tokens: state.tokens,
            max_tokens: self.inner.config.requests_per_minute,
            queue_size: state.queue.len(),
            is_processing: state.processing,
            total_dispatched: state.total_dispatched,
            total_rejected: state.total_rejected,
        }
    }

    /// Hard reset: restores a full bucket and settles every queued waiter
    /// with `ThrottleError::Cancelled`. Operations already admitted are
    /// not affected.
    pub async fn reset(&self) {
        let mut state = self.inner.state.lock().await;
        let abandoned: Vec<QueuedRequest> = mem::take(&mut state.queue);
        state.tokens = f64::from(self.inner.config.requests_per_minute);
        state.last_refill = Instant::now();
        state.last_dispatch = None;

        if !abandoned.is_empty() {
            warn!(
                cancelled = abandoned.len(),
                "rate limiter reset, cancelling queued requests"
            );
        }
        for entry in abandoned {
            let _ = entry.permit_tx.send(Err(ThrottleError::Cancelled));
        }
        self.inner.wakeup.notify_one();
    }
}

impl LimiterState {
    /// Tops up the bucket proportionally to the time elapsed since the
    /// last refill. Applied in whole tokens only, clamped to capacity;
    /// `last_refill` advances only when tokens were actually added.
    pub(super) fn refill(&mut self, config: &RateLimiterConfig) {
        let now = Instant::now();
        let elapsed_ms: f64 = now.duration_since(self.last_refill).as_millis() as f64;
        let tokens_to_add: f64 = elapsed_ms * f64::from(config.requests_per_minute) / REFILL_WINDOW_MS;

        if tokens_to_add >= 1.0 {
            self.tokens = (self.tokens + tokens_to_add).min(f64::from(config.requests_per_minute));
            self.last_refill = now;
        }
    }

    /// Time until one whole token has accrued since the last refill.
    fn time_until_next_token(&self, config: &RateLimiterConfig) -> Duration {
        let ms_per_token: f64 = REFILL_WINDOW_MS / f64::from(config.requests_per_minute);
        let elapsed_ms: f64 = self.last_refill.elapsed().as_millis() as f64;
        let wait_ms: f64 = (ms_per_token - elapsed_ms).max(1.0);
        Duration::from_millis(wait_ms.ceil() as u64)
    }

    /// Remaining portion of the minimum inter-request delay, if any.
    fn min_delay_remaining(&self, config: &RateLimiterConfig) -> Option<Duration> {
        if config.min_request_delay_ms == 0 {
            return None;
        }
        let min_delay = Duration::from_millis(config.min_request_delay_ms);
        let since_last = self.last_dispatch?.elapsed();
        if since_last < min_delay {
            Some(min_delay - since_last)
        } else {
            None
        }
    }
}

/// Single queue-draining loop. Exactly one instance runs at a time,
/// guarded by the `processing` flag; it exits once the queue is empty.
async fn drain(inner: Arc<LimiterInner>) {
    loop {
        let step = {
            let mut state = inner.state.lock().await;
            state.refill(&inner.config);

            if state.queue.is_empty() {
                state.processing = false;
                DrainStep::Idle
            } else if state.tokens < 1.0 {
                DrainStep::Wait(state.time_until_next_token(&inner.config))
            } else if let Some(remaining) = state.min_delay_remaining(&inner.config) {
                DrainStep::Wait(remaining)
            } else {
                // Highest priority first; the sort is stable, so equal
                // priorities keep their arrival order.
                state.queue.sort_by(|a, b| b.priority.cmp(&a.priority));
                let entry = state.queue.remove(0);
                state.tokens -= 1.0;
                state.last_dispatch = Some(Instant::now());
                state.total_dispatched += 1;
                DrainStep::Dispatch(entry)
            }
        };

        match step {
            DrainStep::Idle => return,
            DrainStep::Wait(duration) => {
                tokio::select! {
                    _ = sleep(duration) => {}
                    _ = inner.wakeup.notified() => {}
                }
            }
            DrainStep::Dispatch(entry) => {
                let waited = entry.enqueued_at.elapsed();
                if waited.as_millis() > STALE_WAIT_WARN_MS {
                    warn!(priority = entry.priority, ?waited, "dispatching stale request");
                } else {
                    trace!(priority = entry.priority, ?waited, "dispatching request");
                }
                // The caller may have gone away; the token stays spent.
                let _ = entry.permit_tx.send(Ok(()));
            }
        }
    }
}
