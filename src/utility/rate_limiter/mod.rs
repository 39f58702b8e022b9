//! Rate Limiting
//!
//! Token-bucket admission control for outbound API calls with a bounded,
//! priority-ordered wait queue.
//!
//! Capacity and refill rate both equal the configured requests-per-minute;
//! tokens accrue proportionally to elapsed time and are applied in whole
//! tokens. Queued requests are dispatched highest priority first, ties in
//! arrival order, with an optional fixed minimum spacing between any two
//! dispatches. A single drainer task serves the queue; enqueueing past the
//! configured bound fails immediately rather than waiting.
//!
//! The limiter is transparent for the operations it admits: their output
//! is returned unchanged, and no error is caught or reclassified here.

pub mod constants;
pub mod errors;
pub mod impls;
pub mod types;

pub use errors::ThrottleError;
pub use types::{RateLimiterConfig, RateLimiterStats, RequestRateLimiter};
