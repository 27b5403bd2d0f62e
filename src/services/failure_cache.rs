use std::sync::Arc;
use chrono::{DateTime, Utc, Duration};
use dashmap::DashMap;

use crate::external::quote_provider::QuoteProviderError;

/// A recent upstream failure for a symbol
#[derive(Debug, Clone)]
pub struct FailureInfo {
    pub failed_at: DateTime<Utc>,
    pub kind: FailureKind,
    pub backoff: Duration,
}

impl FailureInfo {
    fn expires_at(&self) -> DateTime<Utc> {
        self.failed_at + self.backoff
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    Unavailable,
}

impl FailureKind {
    /// Classify a provider error. Configuration errors are never backed off.
    pub fn from_error(err: &QuoteProviderError) -> Option<Self> {
        match err {
            QuoteProviderError::MissingApiKey(_) => None,
            QuoteProviderError::RateLimited => Some(FailureKind::RateLimited),
            _ => Some(FailureKind::Unavailable),
        }
    }

    fn backoff(self) -> Duration {
        match self {
            FailureKind::RateLimited => Duration::seconds(60),
            FailureKind::Unavailable => Duration::seconds(30),
        }
    }
}

const MAX_TRACKED_SYMBOLS: usize = 512;

/// Per-symbol backoff after an upstream failure, so a throttled or broken
/// provider is not re-queried on every request.
#[derive(Clone, Default)]
pub struct FailureCache {
    cache: Arc<DashMap<String, FailureInfo>>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active failure for `symbol`, if its backoff has not lapsed
    pub fn is_failed(&self, symbol: &str) -> Option<FailureInfo> {
        let expired = match self.cache.get(symbol) {
            Some(entry) if Utc::now() < entry.expires_at() => return Some(entry.value().clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.cache.remove(symbol);
        }
        None
    }

    pub fn record_failure(&self, symbol: &str, kind: FailureKind) {
        self.record_with_backoff(symbol, kind, kind.backoff());
    }

    pub fn record_with_backoff(&self, symbol: &str, kind: FailureKind, backoff: Duration) {
        let info = FailureInfo {
            failed_at: Utc::now(),
            kind,
            backoff,
        };
        if !self.cache.contains_key(symbol) && self.cache.len() >= MAX_TRACKED_SYMBOLS {
            self.cleanup_expired();
            self.evict_oldest_while_full();
        }
        self.cache.insert(symbol.to_string(), info);
    }

    /// Clear all expired entries from the cache
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.cache.retain(|_, info| now < info.expires_at());
    }

    fn evict_oldest_while_full(&self) {
        while self.cache.len() >= MAX_TRACKED_SYMBOLS {
            let oldest = self
                .cache
                .iter()
                .min_by_key(|entry| entry.value().failed_at)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(symbol) => {
                    self.cache.remove(&symbol);
                }
                None => break,
            }
        }
    }

    pub fn clear(&self, symbol: &str) {
        self.cache.remove(symbol);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
