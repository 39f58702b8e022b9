/// Default settings
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 50;
pub const DEFAULT_MIN_REQUEST_DELAY_MS: u64 = 0;

/// Refill window the requests-per-minute rate is measured over.
pub const REFILL_WINDOW_MS: f64 = 60_000.0;

/// Server-reported remaining capacity below this share of its limit
/// triggers a local token clamp.
pub const SERVER_PRESSURE_RATIO: f64 = 0.1;

/// Queue waits longer than this are logged as stale.
pub const STALE_WAIT_WARN_MS: u128 = 5_000;

pub fn default_requests_per_minute() -> u32 {
    DEFAULT_REQUESTS_PER_MINUTE
}

pub fn default_max_queue_size() -> usize {
    DEFAULT_MAX_QUEUE_SIZE
}

pub fn default_min_request_delay_ms() -> u64 {
    DEFAULT_MIN_REQUEST_DELAY_MS
}
