use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{QuoteConfig, MAX_CACHE_TTL_SECS};
use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::{validate_symbol, Quote};
use crate::services::failure_cache::{FailureCache, FailureKind};
use crate::services::quote_cache::QuoteCache;

/// Fetches quotes through a freshness cache and never fails.
///
/// Every failure (missing credentials, network, throttling, timeout,
/// malformed body) is logged and collapsed into `None`.
pub struct QuoteFetcher {
    provider: Arc<dyn QuoteProvider>,
    cache: QuoteCache,
    failures: FailureCache,
    timeout: StdDuration,
    default_symbol: String,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>, config: &QuoteConfig) -> Self {
        Self {
            provider,
            cache: QuoteCache::new(Duration::seconds(
                config.cache_ttl_secs.clamp(0, MAX_CACHE_TTL_SECS),
            )),
            failures: FailureCache::new(),
            timeout: StdDuration::from_secs(config.http_timeout_secs),
            default_symbol: config.reference_symbol.clone(),
        }
    }

    /// Override the freshness window and upstream timeout
    pub fn with_limits(mut self, ttl: Duration, timeout: StdDuration) -> Self {
        self.cache = QuoteCache::new(ttl);
        self.timeout = timeout;
        self
    }

    pub fn default_symbol(&self) -> &str {
        &self.default_symbol
    }

    /// Quote for `symbol`, or for the reference symbol when none is given.
    pub async fn fetch(&self, symbol: Option<&str>) -> Option<Quote> {
        let symbol = match symbol.map(str::trim).filter(|s| !s.is_empty()) {
            None => self.default_symbol.clone(),
            Some(raw) => match validate_symbol(raw) {
                Ok(symbol) => symbol,
                Err(e) => {
                    warn!("Rejected quote symbol '{}': {}", raw, e);
                    return None;
                }
            },
        };

        let mut slot = self.cache.lock(&symbol).await;

        if let Some(cached) = slot.fresh() {
            debug!("Quote cache hit for {} (fetched at {})", symbol, cached.fetched_at);
            return Some(cached.quote.clone());
        }

        if let Some(failure) = self.failures.is_failed(&symbol) {
            error!(
                "Quote for {} unavailable: {:?} failure from {} at {}, retrying after {}s",
                symbol,
                failure.kind,
                self.provider.name(),
                failure.failed_at,
                failure.backoff.num_seconds()
            );
            return None;
        }

        match self.fetch_upstream(&symbol).await {
            Ok(quote) => {
                info!(
                    "Fetched {} from {}: price={} change={}%",
                    symbol,
                    self.provider.name(),
                    quote.price,
                    quote.change_percent
                );
                self.failures.clear(&symbol);
                slot.store(quote.clone());
                Some(quote)
            }
            Err(e) => {
                match &e {
                    QuoteProviderError::MissingApiKey(key) => {
                        warn!("Quote provider {} not configured ({} missing); serving fallback mood", self.provider.name(), key)
                    }
                    QuoteProviderError::RateLimited => {
                        error!("Rate limited by {} when fetching {}", self.provider.name(), symbol)
                    }
                    _ => error!("Failed to fetch quote for {} from {}: {}", symbol, self.provider.name(), e),
                }
                if let Some(kind) = FailureKind::from_error(&e) {
                    self.failures.record_failure(&symbol, kind);
                }
                None
            }
        }
    }

    async fn fetch_upstream(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        match tokio::time::timeout(self.timeout, self.provider.fetch_quote(symbol)).await {
            Ok(result) => result,
            Err(_) => Err(QuoteProviderError::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}
