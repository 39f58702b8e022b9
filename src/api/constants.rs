/// Backend base URL used when the configuration does not override it.
pub const DEFAULT_API_BASE: &str = "https://api.refsync.dev/v1";

/// Absolute per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENT: &str = concat!("refsync/", env!("CARGO_PKG_VERSION"));

/// Rate-limit header triple reported by the backend. All three must be
/// present for the information to be used; absence is not an error.
/// Names are compared case-insensitively (`X-RateLimit-Limit`, ...).
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Persistent-store key for the latest rate-limit snapshot (UI display).
pub const RATE_LIMIT_INFO_STORAGE_KEY: &str = "rate_limit_info";

/// Endpoints
pub const VERSION_ENDPOINT: &str = "/version";
pub const PROJECTS_ENDPOINT: &str = "/projects";
pub const REFERENCES_ENDPOINT: &str = "/references";

/// Fallback error message when the server supplies neither a message
/// body nor a known status line.
pub const GENERIC_ERROR_MESSAGE: &str = "Request failed";
