// Standard library
use std::sync::Arc;
use std::time::Instant;

// 3rd party crates
use tokio::sync::RwLock;

/// Metrics for API request outcomes
#[derive(Debug, Default, Clone)]
pub struct RequestMetrics {
    /// Total number of logical requests attempted
    pub attempts: u64,
    /// Number of requests that returned a decoded payload
    pub successes: u64,
    /// Number of requests that ended in a classified error
    pub failures: u64,
    /// Number of rate limit rejections (server 429 or local queue full)
    pub rate_limit_hits: u64,
    /// Number of local timeouts
    pub timeouts: u64,
    /// Number of one-shot retries after an authorization rejection
    pub auth_retries: u64,
    /// Last successful request time
    pub last_success: Option<Instant>,
    /// Last failure time
    pub last_failure: Option<Instant>,
}

/// Thread-safe metrics manager
#[derive(Debug, Default, Clone)]
pub struct MetricsManager {
    metrics: Arc<RwLock<RequestMetrics>>,
}

impl MetricsManager {
    /// Creates a new MetricsManager
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request that returned a decoded payload
    pub async fn record_success(&self) {
        let mut metrics = self.metrics.write().await;
        metrics.attempts += 1;
        metrics.successes += 1;
        metrics.last_success = Some(Instant::now());
    }

    /// Records a request that ended in a classified error
    pub async fn record_failure(&self) {
        let mut metrics = self.metrics.write().await;
        metrics.attempts += 1;
        metrics.failures += 1;
        metrics.last_failure = Some(Instant::now());
    }

    /// Records a rate limit rejection
    pub async fn record_rate_limit_hit(&self) {
        self.metrics.write().await.rate_limit_hits += 1;
    }

    /// Records a local timeout
    pub async fn record_timeout(&self) {
        self.metrics.write().await.timeouts += 1;
    }

    /// Records an authorization-triggered retry
    pub async fn record_auth_retry(&self) {
        self.metrics.write().await.auth_retries += 1;
    }

    /// Returns a copy of the current metrics
    pub async fn snapshot(&self) -> RequestMetrics {
        self.metrics.read().await.clone()
    }
}
