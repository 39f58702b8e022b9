// Standard library
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs};

// 3rd party crates
use config::{Config, ConfigError, Environment, File};
use log::{error, info};
use tokio::sync::{RwLock, RwLockReadGuard};

// Current module imports
use super::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG, ENV_PREFIX};
use super::errors::ValidationError;
use super::types::{ConfigManager, Settings};

impl ConfigManager {
    /// Creates a new `ConfigManager` instance by loading the configuration.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path: PathBuf = Self::get_config_path()?;
        Self::ensure_config_file_exists(&config_path)?;

        let settings: Settings = Self::load_settings(&config_path)?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(ConfigManager {
            settings: Arc::new(RwLock::new(settings)),
            config_path,
        })
    }

    /// Determines the configuration file path.
    fn get_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            Ok(PathBuf::from(path))
        } else if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("refsync").join("config.toml"))
        } else {
            let msg: &str = "Could not determine the configuration directory";
            error!("{}", msg);
            Err(ConfigError::Message(msg.into()))
        }
    }

    /// Ensures that the configuration file exists, creating it if necessary.
    fn ensure_config_file_exists(config_path: &Path) -> Result<(), ConfigError> {
        if !config_path.exists() {
            if let Some(parent_dir) = config_path.parent() {
                fs::create_dir_all(parent_dir).map_err(|e| {
                    let msg: String = format!("Failed to create configuration directory: {}", e);
                    error!("{}", msg);
                    ConfigError::Message(msg)
                })?;
            }
            fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                let msg: String = format!("Failed to create default configuration file: {}", e);
                error!("{}", msg);
                ConfigError::Message(msg)
            })?;
            info!("Default configuration file created at: {:?}", config_path);
        }
        Ok(())
    }

    /// Loads settings from the configuration file with environment
    /// variable overrides applied on top.
    fn load_settings(config_path: &Path) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    pub async fn get_settings(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().await
    }

    pub async fn get_log_level(&self) -> String {
        self.settings.read().await.log.level.clone()
    }

    /// Re-reads the configuration file and replaces the current settings
    /// if the new ones validate.
    pub async fn reload(&self) -> Result<(), ConfigError> {
        let settings: Settings = Self::load_settings(&self.config_path)?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;

        *self.settings.write().await = settings;
        info!("Configuration reloaded from {:?}", self.config_path);
        Ok(())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidLogLevel(self.log.level.clone()));
        }

        if self.api.base_url.trim().is_empty() {
            return Err(ValidationError::MissingBaseUrl);
        }

        if self.api.base_url.ends_with('/') {
            return Err(ValidationError::TrailingSlashBaseUrl(
                self.api.base_url.clone(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.rate_limit.requests_per_minute == 0 {
            return Err(ValidationError::InvalidRateLimit(
                "requests_per_minute must be greater than 0".into(),
            ));
        }

        if self.rate_limit.max_queue_size == 0 {
            return Err(ValidationError::InvalidRateLimit(
                "max_queue_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
