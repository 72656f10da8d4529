use crate::core::{
    config::ExchangeConfig,
    errors::ExchangeError,
    journal::{Journal, TracingJournal},
    kernel::{ReqwestRest, RestClientBuilder, RestClientConfig},
};
use crate::exchanges::huobi::{connector::HuobiConnector, signer::HuobiSigner};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.huobi.com";

/// Create a Huobi connector that journals through `tracing`
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<HuobiConnector<ReqwestRest>, ExchangeError> {
    let journal = Arc::new(TracingJournal::new(config.category.clone()));
    build_connector_with_journal(config, journal)
}

/// Create a Huobi connector reporting to a caller-supplied journal
pub fn build_connector_with_journal(
    config: ExchangeConfig,
    journal: Arc<dyn Journal>,
) -> Result<HuobiConnector<ReqwestRest>, ExchangeError> {
    // Create REST client with Huobi configuration
    let rest_config = RestClientConfig::new(
        config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        config.category.clone(),
    )
    .with_timeout(30);

    let mut rest_builder = RestClientBuilder::new(rest_config);

    // Add authentication if available
    if config.has_credentials() {
        let signer = HuobiSigner::new(
            config.api_key().to_string(),
            config.secret_key().to_string(),
        );
        rest_builder = rest_builder.with_signer(Arc::new(signer));
    }

    let rest = rest_builder.build()?;

    Ok(HuobiConnector::new(rest, &config, journal))
}
