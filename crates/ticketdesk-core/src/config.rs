//! Configuration management for the ticketdesk console

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix; nested keys use `__`, e.g.
/// `TICKETDESK__API__BASE_URL`
pub const ENV_PREFIX: &str = "TICKETDESK";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote ticketing API
    #[serde(default)]
    pub api: ApiConfig,

    /// Console behaviour
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote ticketing API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/api/tickets/` paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Console behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Quiet period after the last search keystroke before the list refetches
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Number of tickets shown in the dashboard's recent activity feed
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,

    /// Paint badges and bars with ANSI colours
    #[serde(default = "default_color")]
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_timeout_seconds() -> u64 {
    30
}

const fn default_search_debounce_ms() -> u64 {
    300
}

const fn default_recent_activity_limit() -> usize {
    5
}

const fn default_color() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            recent_activity_limit: default_recent_activity_limit(),
            color: default_color(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl UiConfig {
    /// Search debounce as a [`Duration`]
    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Config {
    /// Load configuration from `ticketdesk.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required) or the default
    /// optional `ticketdesk.toml`, then overlay environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or any layer cannot be parsed.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("ticketdesk").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }

    /// Check values that deserialize fine but cannot work
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first offending key.
    pub fn validate(&self) -> crate::Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(crate::Error::Configuration {
                message: "api.base_url must not be empty".to_string(),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(crate::Error::Configuration {
                message: format!("api.base_url must be an http(s) URL, got '{base_url}'"),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(crate::Error::Configuration {
                message: "api.timeout_seconds must be greater than zero".to_string(),
            });
        }
        if self.ui.search_debounce_ms == 0 {
            return Err(crate::Error::Configuration {
                message: "ui.search_debounce_ms must be greater than zero".to_string(),
            });
        }
        if self.ui.recent_activity_limit == 0 {
            return Err(crate::Error::Configuration {
                message: "ui.recent_activity_limit must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
