// Standard library
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

// Project imports
use crate::auth::traits::CredentialSource;
use crate::auth::types::CsrfTokenManager;
use crate::metrics::types::MetricsManager;
use crate::storage::traits::KeyValueStore;
use crate::utility::deduplicator::types::RequestDeduplicator;
use crate::utility::rate_limiter::types::RequestRateLimiter;

// Current module imports
use super::constants::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use super::errors::ApiError;
use super::traits::HttpTransport;

/// Client-wide configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend base URL, no trailing slash; endpoints are appended as-is.
    pub base_url: String,
    /// Absolute timeout applied to every dispatch.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Per-call options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Disables credential and anti-forgery attachment (unauthenticated
    /// endpoints such as the version check).
    pub skip_auth: bool,
    /// Allows the single authorization-triggered retry. Enabled by
    /// default.
    pub retry_on_401: bool,
    /// Admission priority; higher runs first.
    pub priority: i32,
    /// Logical-operation identity for deduplication of reads. Defaults
    /// to `"METHOD endpoint"`.
    pub dedupe_key: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            skip_auth: false,
            retry_on_401: true,
            priority: 0,
            dedupe_key: None,
        }
    }
}

/// Server-reported rate-limit snapshot (`X-RateLimit-*` header triple).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    /// Unix timestamp in seconds at which the server window resets.
    pub reset: u64,
}

/// A composed request handed to the transport.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Header pairs; names are matched case-insensitively downstream.
    pub headers: Vec<(String, String)>,
    /// JSON body for state-mutating calls.
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Status, headers and body of one HTTP exchange, before classification.
#[derive(Debug, Clone)]
pub struct ApiResponseParts {
    pub status: u16,
    /// Header names lowercased by the transport.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiResponseParts {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Represents a client for the reference-management backend.
///
/// Explicitly composed: the deduplicator, rate limiter, transport,
/// credential source and store are injected by the application's
/// composition root. Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct ApiClient {
    pub(super) config: ApiConfig,
    pub(super) transport: Arc<dyn HttpTransport>,
    pub(super) deduplicator: Arc<RequestDeduplicator<Result<String, ApiError>>>,
    pub(super) rate_limiter: RequestRateLimiter,
    pub(super) credentials: Arc<dyn CredentialSource>,
    pub(super) store: Arc<dyn KeyValueStore>,
    pub(super) csrf: CsrfTokenManager,
    pub(super) metrics: MetricsManager,
    pub(super) rate_limit_info: Arc<RwLock<Option<RateLimitInfo>>>,
}

/// `HttpTransport` over a `reqwest::Client`.
pub struct ReqwestTransport {
    pub(super) client: reqwest::Client,
}
