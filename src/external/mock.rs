use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::Quote;
use async_trait::async_trait;
use rand::Rng;

/// Offline provider for local development: a quote around 100 with a daily
/// change drawn uniformly from -2.5% to +2.5%.
pub struct MockQuoteProvider;

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let mut rng = rand::rng();
        let change_percent: f64 = rng.random_range(-2.5..=2.5);
        let price = 100.0 * (1.0 + change_percent / 100.0);

        Ok(Quote::new(symbol, price, change_percent))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
