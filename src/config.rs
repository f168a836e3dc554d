//! Application configuration loaded from environment variables.

use serde::Deserialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use crate::error::ConfigError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === API ===
    /// CLOB API base URL.
    #[serde(default = "default_clob_url")]
    pub polymarket_clob_url: String,

    // === HTTP ===
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Connection establishment timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub http_connect_timeout_ms: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_clob_url() -> String {
    "https://clob.polymarket.com".to_string()
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    concat!("market-scout/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polymarket_clob_url: default_clob_url(),
            http_timeout_ms: default_http_timeout_ms(),
            http_connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Build a configuration pointing at a different API host.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            polymarket_clob_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.polymarket_clob_url).map_err(|e| ConfigError::Invalid {
            field: "POLYMARKET_CLOB_URL",
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "POLYMARKET_CLOB_URL",
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        if url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                field: "POLYMARKET_CLOB_URL",
                reason: "must be a base URL".to_string(),
            });
        }

        if self.http_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "HTTP_TIMEOUT_MS",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.http_connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "HTTP_CONNECT_TIMEOUT_MS",
                reason: "must be greater than 0".to_string(),
            });
        }

        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid {
                field: "LOG_FORMAT",
                reason: format!("expected pretty or json, got {}", self.log_format),
            });
        }

        Ok(())
    }

    /// Initialize the tracing subscriber.
    ///
    /// `RUST_LOG` from the process environment wins over the configured
    /// level; `verbose` forces debug output for this crate.
    pub fn init_logging(&self, verbose: bool) {
        let filter = if verbose {
            EnvFilter::new("market_scout=debug,info")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.rust_log))
        };

        let registry = tracing_subscriber::registry().with(filter);
        if self.log_format == "json" {
            registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
        } else {
            registry.with(fmt::layer().with_writer(std::io::stderr)).init();
        }
    }
}
