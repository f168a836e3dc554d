//! Unified error types for market search and price snapshots.

use thiserror::Error;

/// Top-level error type for the scout.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Market data error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// JSON encoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to the market data API.
#[derive(Error, Debug)]
pub enum MarketError {
    /// The API answered with a non-2xx status.
    #[error("request to {url} failed with HTTP {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// HTTP request failed before a response arrived.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape.
    #[error("failed to parse market data: {0}")]
    Parse(String),

    /// The market has no outcome token labelled "YES".
    #[error("no YES token found for market {market_id}")]
    NoYesToken {
        /// Market (condition) identifier that was looked up.
        market_id: String,
    },

    /// The configured base URL cannot be extended into an endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl MarketError {
    /// Whether this error came from the transport rather than the data.
    ///
    /// Transport errors abort the current operation; `NoYesToken` means the
    /// market is unsupported by the snapshotter.
    pub fn is_transport(&self) -> bool {
        matches!(self, MarketError::HttpStatus { .. } | MarketError::Http(_))
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment could not be deserialized.
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    /// A value was present but not acceptable.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Environment variable name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ScoutError>;
