use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::Quote;
use async_trait::async_trait;
use tracing::{info, warn};

/// Tries the primary provider first and falls back to the secondary one.
///
/// When both fail the fallback's error is returned, except that a configured
/// primary's upstream failure wins over an unconfigured fallback so the caller
/// logs the more useful reason.
pub struct MultiProvider {
    primary: Box<dyn QuoteProvider>,
    fallback: Box<dyn QuoteProvider>,
}

impl MultiProvider {
    pub fn new(primary: Box<dyn QuoteProvider>, fallback: Box<dyn QuoteProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl QuoteProvider for MultiProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let primary_err = match self.primary.fetch_quote(symbol).await {
            Ok(quote) => return Ok(quote),
            Err(e) => e,
        };

        if primary_err.is_configuration() {
            info!("{} not configured, trying {} for {}", self.primary.name(), self.fallback.name(), symbol);
        } else {
            warn!(
                "{} failed for {}: {}. Trying {}.",
                self.primary.name(),
                symbol,
                primary_err,
                self.fallback.name()
            );
        }

        match self.fallback.fetch_quote(symbol).await {
            Ok(quote) => {
                info!("✓ Fetched {} from fallback provider {}", symbol, self.fallback.name());
                Ok(quote)
            }
            Err(fallback_err) if fallback_err.is_configuration() && !primary_err.is_configuration() => {
                Err(primary_err)
            }
            Err(fallback_err) => Err(fallback_err),
        }
    }

    fn name(&self) -> &'static str {
        "multi"
    }
}
