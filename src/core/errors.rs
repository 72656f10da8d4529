use crate::core::types::KlineInterval;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    #[error("Unsupported kline interval: {0}")]
    UnsupportedInterval(KlineInterval),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {code} - {message}")]
    ApiError { code: i64, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExchangeError {
    /// True for failures detected before any request left the process.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedSymbol(_) | Self::UnsupportedInterval(_) | Self::InvalidParameters(_)
        )
    }

    /// True when the exchange answered but refused the request.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::ApiError { .. } | Self::Rejected(_))
    }
}
