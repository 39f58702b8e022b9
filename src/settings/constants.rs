// Project imports
use crate::api::constants::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "REFSYNC_CONFIG_PATH";

/// Prefix for environment-variable overrides of individual settings,
/// e.g. `REFSYNC__API__BASE_URL`.
pub const ENV_PREFIX: &str = "REFSYNC";

/// Default configuration written on first run.
pub const DEFAULT_CONFIG: &str = r#"# refsync configuration

[log]
# one of: error, warn, info, debug, trace
level = "info"

[api]
# base_url = "https://api.refsync.dev/v1"
# timeout_secs = 30
# session_cookie = "refsync_session=..."

[rate_limit]
requests_per_minute = 60
max_queue_size = 50
min_request_delay_ms = 0
"#;

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

pub fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
