// Standard library
use std::sync::Arc;

// 3rd party crates
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, Mutex, Notify};
use tokio::time::Instant;

// Current module imports
use super::constants::{
    default_max_queue_size, default_min_request_delay_ms, default_requests_per_minute,
};
use super::errors::ThrottleError;

/// Rate limiting configuration for outbound API calls.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained requests allowed per minute; also the bucket capacity.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    /// Maximum number of requests allowed to wait for admission.
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
    /// Floor on the spacing between any two dispatches, in milliseconds.
    /// Zero disables spacing.
    #[serde(default = "default_min_request_delay_ms")]
    pub min_request_delay_ms: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            max_queue_size: default_max_queue_size(),
            min_request_delay_ms: default_min_request_delay_ms(),
        }
    }
}

/// Token-bucket rate limiter with a bounded, priority-ordered wait queue.
///
/// Cloning is cheap; all clones share the same bucket and queue.
#[derive(Clone)]
pub struct RequestRateLimiter {
    pub(super) inner: Arc<LimiterInner>,
}

pub(super) struct LimiterInner {
    pub(super) config: RateLimiterConfig,
    pub(super) state: Mutex<LimiterState>,
    /// Wakes a sleeping drainer early when the queue or bucket changed
    /// under it (new arrival, reset). The drainer re-evaluates its wait
    /// on every wake, so spurious wakes are harmless.
    pub(super) wakeup: Notify,
}

/// Admission-control state. All fields are guarded by the limiter mutex;
/// mutation only happens between suspension points.
pub(super) struct LimiterState {
    /// Current token count, in `[0, requests_per_minute]`.
    pub(super) tokens: f64,
    pub(super) last_refill: Instant,
    pub(super) last_dispatch: Option<Instant>,
    pub(super) queue: Vec<QueuedRequest>,
    /// Guards the single drainer task.
    pub(super) processing: bool,
    pub(super) total_dispatched: u64,
    pub(super) total_rejected: u64,
}

/// A caller waiting for admission.
pub(super) struct QueuedRequest {
    /// Higher runs first; ties preserve arrival order.
    pub(super) priority: i32,
    /// Diagnostics only (stale-wait logging).
    pub(super) enqueued_at: Instant,
    /// Completion channel back to the caller: `Ok(())` grants the permit,
    /// `Err` settles the wait without admission.
    pub(super) permit_tx: oneshot::Sender<Result<(), ThrottleError>>,
}

/// Point-in-time limiter snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimiterStats {
    pub tokens: f64,
    pub max_tokens: u32,
    pub queue_size: usize,
    pub is_processing: bool,
    pub total_dispatched: u64,
    pub total_rejected: u64,
}
