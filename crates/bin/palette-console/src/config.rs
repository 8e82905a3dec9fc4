//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `palette.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use palette_app::services::status_poller::PollerConfig;
use palette_domain::filter::DEFAULT_PAGE_SIZE;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Palette server settings.
    pub server: ServerConfig,
    /// Poll loop settings.
    pub monitor: MonitorConfig,
    /// Status cookie persistence.
    pub cookies: CookiesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Remote server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the palette web application.
    pub url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Status monitor configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between two polls in milliseconds.
    pub interval_ms: u64,
    /// Request the event list (`false` polls the status only).
    pub include_events: bool,
    /// Events per page.
    pub page_size: u32,
}

/// Cookie jar configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CookiesConfig {
    /// JSON file holding the status cookies.
    pub path: PathBuf,
    /// Cookie lifetime in days; session cookies when unset.
    pub expires_days: Option<u32>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `palette.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("palette.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("PALETTE_URL") {
            self.server.url = val;
        }
        if let Some(val) = var("PALETTE_POLL_INTERVAL_MS") {
            if let Ok(interval) = val.parse() {
                self.monitor.interval_ms = interval;
            }
        }
        if let Some(val) = var("PALETTE_EVENTS") {
            if let Ok(include_events) = val.parse() {
                self.monitor.include_events = include_events;
            }
        }
        if let Some(val) = var("PALETTE_COOKIE_FILE") {
            self.cookies.path = PathBuf::from(val);
        }
        if let Some(val) = var("PALETTE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server url must not be empty".to_string(),
            ));
        }
        if self.monitor.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be non-zero".to_string(),
            ));
        }
        if self.monitor.page_size == 0 {
            return Err(ConfigError::Validation(
                "page size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Timeout applied to every HTTP request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.timeout_ms)
    }

    /// Settings handed to the status poller.
    #[must_use]
    pub fn poller(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.monitor.interval_ms),
            page_size: self.monitor.page_size,
            cookie_expiry_days: self.cookies.expires_days,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            include_events: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for CookiesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("palette-cookies.json"),
            expires_days: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "palette_console=info,palette_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
