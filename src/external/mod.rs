pub mod alphavantage;
pub mod mock;
pub mod multi_provider;
pub mod quote_provider;
pub mod twelvedata;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{ProviderKind, QuoteConfig};
use alphavantage::AlphaVantageProvider;
use mock::MockQuoteProvider;
use multi_provider::MultiProvider;
use quote_provider::{QuoteProvider, QuoteProviderError};
use twelvedata::TwelveDataProvider;

/// Build the configured quote provider.
///
/// Missing API keys are not an error here; providers report them per fetch.
pub fn build_provider(config: &QuoteConfig) -> Result<Arc<dyn QuoteProvider>, QuoteProviderError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

    let provider: Arc<dyn QuoteProvider> = match config.provider {
        ProviderKind::AlphaVantage => Arc::new(AlphaVantageProvider::new(
            client,
            config.alphavantage_api_key.clone(),
        )),
        ProviderKind::TwelveData => Arc::new(TwelveDataProvider::new(
            client,
            config.twelvedata_api_key.clone(),
        )),
        ProviderKind::Multi => {
            let primary = Box::new(TwelveDataProvider::new(
                client.clone(),
                config.twelvedata_api_key.clone(),
            ));
            let fallback = Box::new(AlphaVantageProvider::new(
                client,
                config.alphavantage_api_key.clone(),
            ));
            Arc::new(MultiProvider::new(primary, fallback))
        }
        ProviderKind::Mock => Arc::new(MockQuoteProvider),
    };

    Ok(provider)
}
