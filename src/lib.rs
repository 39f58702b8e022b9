//! refsync — request-orchestration core for a reference-manager client.
//!
//! The crate wraps every call to the reference-management backend in
//! three cooperating layers:
//!
//! - a request deduplicator that collapses concurrent identical reads
//!   into one in-flight operation,
//! - a token-bucket rate limiter with a bounded, priority-ordered wait
//!   queue,
//! - an authenticated API client that attaches the session credential
//!   and anti-forgery token, classifies failures into a typed taxonomy,
//!   and retries exactly once after an authorization rejection.
//!
//! All components are explicitly constructed and injected; there is no
//! global state. See the `api` module for the composed entry point.

// Project modules
pub mod api;
pub mod auth;
pub mod metrics;
pub mod models;
pub mod settings;
pub mod storage;
pub mod utility;

// Re-exports of the composed surface.
pub use api::errors::ApiError;
pub use api::types::{ApiClient, ApiConfig, RateLimitInfo, RequestOptions};
pub use settings::types::{ConfigManager, Settings};
pub use utility::deduplicator::types::RequestDeduplicator;
pub use utility::rate_limiter::errors::ThrottleError;
pub use utility::rate_limiter::types::{RateLimiterConfig, RequestRateLimiter};
