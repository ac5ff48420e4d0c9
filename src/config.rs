//! Application configuration loading and validation.
//!
//! Configuration is read from an optional TOML file with environment
//! variable overrides for deployment values like `RATES_URL`, plus CLI
//! overrides for the bind address.

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::error::{ConfigError, Result};

/// Config file consulted when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// WebSocket listener bind address.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream rates feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Feed URL. Overridden by the `RATES_URL` env var; when absent the
    /// crawler is disabled and the service only serves stored history.
    #[serde(default)]
    pub url: Option<String>,
    /// Seconds between polls, measured from tick start.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            url: None,
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format, `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. With no path, the default
    /// `config.toml` is used when present, otherwise built-in defaults.
    /// `RATES_URL` from the environment overrides the file value.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        let config = config.with_env_overrides(std::env::var("RATES_URL").ok());
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Apply environment overrides. Empty values are treated as unset.
    pub fn with_env_overrides(mut self, rates_url: Option<String>) -> Self {
        if let Some(url) = rates_url {
            if !url.is_empty() {
                self.rates.url = Some(url);
            }
        }
        self
    }

    /// Apply `-H`/`-P` flag overrides on top of the file values.
    pub fn with_cli_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(url) = &self.rates.url {
            let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidValue {
                field: "rates.url",
                reason: e.to_string(),
            })?;

            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidValue {
                    field: "rates.url",
                    reason: format!("unsupported scheme: {}", parsed.scheme()),
                }
                .into());
            }
        }

        if self.rates.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rates.poll_interval_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.format",
                    reason: format!("unknown format: {other}"),
                }
                .into());
            }
        }

        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
