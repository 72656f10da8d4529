use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Default number of candlesticks retained per window when the caller gives no size
pub const DEFAULT_RECORDS_WINDOW: usize = 200;

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub base_url: Option<String>,
    /// Base asset used for the derived `stock` / `frozen_stock` account fields
    pub main_stock: String,
    /// Tag attached to every journal entry (log channel)
    pub category: String,
    pub records_window: usize,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 6)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("main_stock", &self.main_stock)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("records_window", &self.records_window)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            base_url: Option<String>,
            #[serde(default = "default_main_stock")]
            main_stock: String,
            #[serde(default = "default_category")]
            category: String,
            #[serde(default = "default_records_window")]
            records_window: usize,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            base_url: helper.base_url,
            main_stock: helper.main_stock,
            category: helper.category,
            records_window: helper.records_window,
        })
    }
}

fn default_main_stock() -> String {
    "BTC".to_string()
}

fn default_category() -> String {
    "huobi".to_string()
}

const fn default_records_window() -> usize {
    DEFAULT_RECORDS_WINDOW
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            base_url: None,
            main_stock: default_main_stock(),
            category: default_category(),
            records_window: DEFAULT_RECORDS_WINDOW,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `HUOBI_API_KEY`)
    /// - `{EXCHANGE}_SECRET_KEY` (e.g., `HUOBI_SECRET_KEY`)
    /// - `{EXCHANGE}_BASE_URL` (optional)
    /// - `{EXCHANGE}_MAIN_STOCK` (optional, defaults to BTC)
    /// - `{EXCHANGE}_RECORDS_WINDOW` (optional, defaults to 200)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let api_key_var = format!("{}_API_KEY", prefix);
        let secret_key_var = format!("{}_SECRET_KEY", prefix);
        let records_window_var = format!("{}_RECORDS_WINDOW", prefix);

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        let records_window = match env::var(&records_window_var) {
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!(
                    "{} must be a positive integer: {}",
                    records_window_var, e
                ))
            })?,
            Err(_) => DEFAULT_RECORDS_WINDOW,
        };

        let mut config = Self::new(api_key, secret_key).records_window(records_window);
        if let Ok(base_url) = env::var(format!("{}_BASE_URL", prefix)) {
            config = config.base_url(base_url);
        }
        if let Ok(main_stock) = env::var(format!("{}_MAIN_STOCK", prefix)) {
            config = config.main_stock(main_stock);
        }
        config.category = exchange_prefix.to_lowercase();

        Ok(config)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            // A missing file is fine, system env vars still apply
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Create configuration for read-only operations (market data only)
    #[must_use]
    pub fn read_only() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Check if this configuration has valid credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the main stock; unsupported values are resolved to BTC by the connector
    #[must_use]
    pub fn main_stock(mut self, main_stock: impl Into<String>) -> Self {
        self.main_stock = main_stock.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub const fn records_window(mut self, records_window: usize) -> Self {
        self.records_window = records_window;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_redacts_credentials() {
        let config = ExchangeConfig::new("access".to_string(), "very-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("[REDACTED]"));
        assert!(!json.contains("very-secret"));
        assert!(!json.contains("access"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ExchangeConfig =
            serde_json::from_str(r#"{"api_key":"a","secret_key":"s","base_url":null}"#).unwrap();

        assert_eq!(config.api_key(), "a");
        assert_eq!(config.secret_key(), "s");
        assert_eq!(config.main_stock, "BTC");
        assert_eq!(config.category, "huobi");
        assert_eq!(config.records_window, DEFAULT_RECORDS_WINDOW);
    }

    #[test]
    fn test_read_only_has_no_credentials() {
        assert!(!ExchangeConfig::read_only().has_credentials());
        assert!(ExchangeConfig::new("a".to_string(), "s".to_string()).has_credentials());
    }

    #[test]
    fn test_builder_setters() {
        let config = ExchangeConfig::read_only()
            .main_stock("LTC")
            .category("huobi-ltc")
            .records_window(50)
            .base_url("http://localhost:8080".to_string());

        assert_eq!(config.main_stock, "LTC");
        assert_eq!(config.category, "huobi-ltc");
        assert_eq!(config.records_window, 50);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080"));
    }
}
