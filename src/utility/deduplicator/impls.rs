// Standard library
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// 3rd party crates
use futures::FutureExt;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

// Current module imports
use super::types::{PendingRequest, RequestDeduplicator};

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Returns the result of the logical operation identified by `key`.
    ///
    /// If no operation is registered under `key`, the supplier is invoked
    /// and its future registered; otherwise the existing in-flight future
    /// is joined and the supplier is not invoked. The registered future is
    /// spawned, so it settles even if all callers are dropped.
    pub async fn dedupe<F, Fut>(&self, key: &str, supplier: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut pending = self.pending.lock().await;

            if let Some(entry) = pending.get_mut(key) {
                entry.ref_count += 1;
                debug!(
                    key = %key,
                    waiters = entry.ref_count,
                    in_flight_for = ?entry.registered_at.elapsed(),
                    "joining in-flight request"
                );
                entry.shared.clone()
            } else {
                let id: u64 = self.next_id.fetch_add(1, Ordering::Relaxed);
                let map = Arc::clone(&self.pending);
                let owned_key: String = key.to_string();
                let operation = supplier();

                // Settlement removes the entry before any caller observes
                // the result, so late arrivals start a fresh operation.
                // The generation check keeps an old settlement from
                // evicting an entry registered after a clear().
                let wrapped = async move {
                    let output = operation.await;
                    let mut pending = map.lock().await;
                    if pending.get(&owned_key).is_some_and(|e| e.id == id) {
                        pending.remove(&owned_key);
                    }
                    output
                }
                .boxed()
                .shared();

                trace!(key = %key, "registering request");
                pending.insert(
                    key.to_string(),
                    PendingRequest {
                        shared: wrapped.clone(),
                        id,
                        ref_count: 1,
                        registered_at: Instant::now(),
                    },
                );

                // Keep the operation running even if every caller drops.
                tokio::spawn(wrapped.clone());

                wrapped
            }
        };

        shared.await
    }

    /// Whether an operation is currently in flight for `key`.
    pub async fn is_pending(&self, key: &str) -> bool {
        self.pending.lock().await.contains_key(key)
    }

    /// Number of distinct in-flight operations.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Number of callers attached to `key`, if it is in flight.
    pub async fn waiter_count(&self, key: &str) -> Option<u64> {
        self.pending.lock().await.get(key).map(|e| e.ref_count)
    }

    /// Forgets all registrations without cancelling the underlying
    /// operations; already-issued calls continue, only the bookkeeping
    /// resets.
    pub async fn clear(&self) {
        let mut pending = self.pending.lock().await;
        let forgotten: usize = pending.len();
        pending.clear();
        if forgotten > 0 {
            debug!(forgotten, "deduplicator registrations cleared");
        }
    }
}

impl<T> Default for RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
