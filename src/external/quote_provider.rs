use async_trait::async_trait;
use thiserror::Error;

use crate::models::Quote;

#[derive(Debug, Error)]
pub enum QuoteProviderError {
    #[error("API key not configured: {0}")]
    MissingApiKey(&'static str),

    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("timed out after {0}ms")]
    Timeout(u64),
}

impl QuoteProviderError {
    /// Missing credentials are a configuration problem, everything else is upstream.
    pub fn is_configuration(&self) -> bool {
        matches!(self, QuoteProviderError::MissingApiKey(_))
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
