// Standard library
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

// 3rd party crates
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Collapses concurrent identical logical requests into one in-flight
/// operation, fanning the single result out to all callers.
///
/// `T` is the settled value shared between callers; for fallible
/// operations it is a `Result` whose both arms are `Clone`.
pub struct RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(super) pending: Arc<Mutex<HashMap<String, PendingRequest<T>>>>,
    pub(super) next_id: AtomicU64,
}

/// Bookkeeping for one in-flight logical request.
pub(super) struct PendingRequest<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The shared future all concurrent callers attach to.
    pub(super) shared: Shared<BoxFuture<'static, T>>,
    /// Generation id; settlement removes the entry only if it still owns
    /// the key (a `clear()` may have re-registered it in the meantime).
    pub(super) id: u64,
    /// Number of callers currently attached. Monitoring only.
    pub(super) ref_count: u64,
    pub(super) registered_at: Instant,
}
