//! Configuration management
//!
//! Configuration is assembled from:
//! - Default values
//! - A configuration file (YAML/JSON)
//! - Environment variables (a `.env` file is honored)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::endpoints::Environment;
use crate::http::{RetryPolicy, TimeoutConfig};
use crate::{Error, Result};

pub const ENV_ENVIRONMENT: &str = "TRIPKIT_ENV";
pub const ENV_API_URL: &str = "TRIPKIT_API_URL";
pub const ENV_CREDENTIALS: &str = "TRIPKIT_CREDENTIALS";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend environment selecting the default base URL
    pub environment: Environment,

    /// Base URL override, wins over `environment`
    pub base_url: Option<String>,

    /// Request timeouts
    pub timeouts: TimeoutSettings,

    /// Retry policy for services that retry (weather)
    pub retry: RetrySettings,

    /// Where the CLI keeps its session tokens
    pub credentials_path: Option<PathBuf>,
}

/// Timeouts in whole seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub connect_secs: u64,
    pub request_secs: u64,
    pub upload_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            base_url: None,
            timeouts: TimeoutSettings::default(),
            retry: RetrySettings::default(),
            credentials_path: None,
        }
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        let defaults = TimeoutConfig::default();
        Self {
            connect_secs: defaults.connect_timeout.as_secs(),
            request_secs: defaults.request_timeout.as_secs(),
            upload_secs: defaults.upload_timeout.as_secs(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        let defaults = RetryPolicy::default();
        Self {
            max_attempts: defaults.max_attempts,
            base_delay_ms: defaults.base_delay_ms,
            max_delay_ms: defaults.max_delay_ms,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load from `file` or the default locations, then apply the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load_default_file(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_default_file() -> Self {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration file");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable configuration file");
                    }
                }
            }
        }

        Self::default()
    }

    /// Configuration file paths checked in order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("tripkit.yaml"), PathBuf::from("tripkit.json")];

        if let Some(config_dir) = dirs::config_dir() {
            let tripkit_dir = config_dir.join("tripkit");
            paths.push(tripkit_dir.join("config.yaml"));
            paths.push(tripkit_dir.join("config.json"));
        }

        paths
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(environment) = lookup(ENV_ENVIRONMENT) {
            self.environment = environment.parse()?;
        }

        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.is_empty()) {
            self.base_url = Some(url);
        }

        if let Some(path) = lookup(ENV_CREDENTIALS).filter(|path| !path.is_empty()) {
            self.credentials_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Base URL the pipeline resolves paths against
    pub fn api_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.environment.base_url().to_string())
    }

    pub fn timeout_config(&self) -> TimeoutConfig {
        TimeoutConfig::new(
            Duration::from_secs(self.timeouts.connect_secs),
            Duration::from_secs(self.timeouts.request_secs),
            Duration::from_secs(self.timeouts.upload_secs),
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.max_attempts)
            .with_base_delay(self.retry.base_delay_ms)
            .with_max_delay(self.retry.max_delay_ms)
    }

    /// Credential file location, defaulting to the user data directory
    pub fn credentials_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.credentials_path {
            return Ok(path.clone());
        }

        dirs::data_dir()
            .map(|dir| dir.join("tripkit").join("credentials.json"))
            .ok_or_else(|| Error::configuration("Could not determine a data directory for credentials"))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            _ => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}
