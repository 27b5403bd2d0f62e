use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_REFERENCE_SYMBOL: &str = "SPY";
pub const DEFAULT_CACHE_TTL_SECS: i64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const MAX_CACHE_TTL_SECS: i64 = 86_400;
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 300;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Which upstream quote source to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    AlphaVantage,
    TwelveData,
    /// Twelve Data first, Alpha Vantage as fallback
    Multi,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alphavantage" => Ok(ProviderKind::AlphaVantage),
            "twelvedata" => Ok(ProviderKind::TwelveData),
            "multi" => Ok(ProviderKind::Multi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!(
                "Invalid QUOTE_PROVIDER: {}. Must be 'alphavantage', 'twelvedata', 'multi' or 'mock'",
                other
            )),
        }
    }
}

/// Settings for the quote fetch layer
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub provider: ProviderKind,
    pub alphavantage_api_key: Option<String>,
    pub twelvedata_api_key: Option<String>,
    pub reference_symbol: String,
    pub cache_ttl_secs: i64,
    pub http_timeout_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::AlphaVantage,
            alphavantage_api_key: None,
            twelvedata_api_key: None,
            reference_symbol: DEFAULT_REFERENCE_SYMBOL.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub quote: QuoteConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("QUOTE_PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>()?,
            None => ProviderKind::AlphaVantage,
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid BIND_ADDR: {}", e))?;

        let quote = QuoteConfig {
            provider,
            alphavantage_api_key: non_empty(lookup("ALPHAVANTAGE_API_KEY")),
            twelvedata_api_key: non_empty(lookup("TWELVEDATA_API_KEY")),
            reference_symbol: non_empty(lookup("MOOD_REFERENCE_SYMBOL"))
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|| DEFAULT_REFERENCE_SYMBOL.to_string()),
            cache_ttl_secs: parse_in_range(
                &lookup,
                "QUOTE_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
                0..=MAX_CACHE_TTL_SECS,
            ),
            http_timeout_secs: parse_in_range(
                &lookup,
                "QUOTE_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
                1..=MAX_HTTP_TIMEOUT_SECS,
            ),
        };

        Ok(Self { bind_addr, quote })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid {}='{}', using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

fn parse_in_range<F, T>(lookup: &F, key: &str, default: T, range: RangeInclusive<T>) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display + Copy + PartialOrd,
{
    let value = parse_or_default(lookup, key, default);
    if range.contains(&value) {
        value
    } else {
        warn!(
            "{}={} outside {}..={}, using default {}",
            key,
            value,
            range.start(),
            range.end(),
            default
        );
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.quote.provider, ProviderKind::AlphaVantage);
        assert_eq!(config.quote.reference_symbol, "SPY");
        assert_eq!(config.quote.cache_ttl_secs, 300);
        assert_eq!(config.quote.http_timeout_secs, 10);
        assert!(config.quote.alphavantage_api_key.is_none());
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[
            ("QUOTE_PROVIDER", "Multi"),
            ("ALPHAVANTAGE_API_KEY", "av-key"),
            ("MOOD_REFERENCE_SYMBOL", "qqq"),
            ("QUOTE_CACHE_TTL_SECS", "60"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();

        assert_eq!(config.quote.provider, ProviderKind::Multi);
        assert_eq!(config.quote.alphavantage_api_key.as_deref(), Some("av-key"));
        assert_eq!(config.quote.reference_symbol, "QQQ");
        assert_eq!(config.quote.cache_ttl_secs, 60);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("TWELVEDATA_API_KEY", "   ")]).unwrap();
        assert!(config.quote.twelvedata_api_key.is_none());
    }

    #[test]
    fn test_bad_number_falls_back_to_default() {
        let config = config_from(&[("QUOTE_HTTP_TIMEOUT_SECS", "soon")]).unwrap();
        assert_eq!(config.quote.http_timeout_secs, 10);
    }

    #[test]
    fn test_out_of_range_ttl_falls_back_to_default() {
        for raw in ["100000000000000", "9223372036854775807", "-5", "86401"] {
            let config = config_from(&[("QUOTE_CACHE_TTL_SECS", raw)]).unwrap();
            assert_eq!(config.quote.cache_ttl_secs, 300, "ttl for {}", raw);
        }

        let config = config_from(&[("QUOTE_CACHE_TTL_SECS", "86400")]).unwrap();
        assert_eq!(config.quote.cache_ttl_secs, 86_400);
        let config = config_from(&[("QUOTE_CACHE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.quote.cache_ttl_secs, 0);
    }

    #[test]
    fn test_out_of_range_timeout_falls_back_to_default() {
        let config = config_from(&[("QUOTE_HTTP_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(config.quote.http_timeout_secs, 10);
        let config = config_from(&[("QUOTE_HTTP_TIMEOUT_SECS", "100000")]).unwrap();
        assert_eq!(config.quote.http_timeout_secs, 10);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = config_from(&[("QUOTE_PROVIDER", "bloomberg")]).unwrap_err();
        assert!(err.contains("QUOTE_PROVIDER"));
    }
}
