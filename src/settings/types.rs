// Standard library
use std::path::PathBuf;
use std::sync::Arc;

// 3rd party crates
use serde::Deserialize;
use tokio::sync::RwLock;

// Project imports
use crate::utility::rate_limiter::types::RateLimiterConfig;

// Current module imports
use super::constants::{default_base_url, default_log_level, default_timeout_secs};

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Backend base URL, no trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Absolute per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Full session cookie pair (`name=value`) for authenticated calls.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            session_cookie: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub log: Log,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub rate_limit: RateLimiterConfig,
}

/// Manages the application settings, allowing for loading and reloading
/// configurations.
pub struct ConfigManager {
    pub settings: Arc<RwLock<Settings>>,
    pub(super) config_path: PathBuf,
}
