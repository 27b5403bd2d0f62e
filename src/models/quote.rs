use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one ticker at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    /// Signed daily change in percentage units (1.23 means +1.23%).
    pub change_percent: f64,
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, price: f64, change_percent: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            change_percent,
            fetched_at: Utc::now(),
        }
    }
}

/// Parse a provider change-percent string such as `"1.23%"` or `"-0.4512"`.
///
/// Anything that does not parse to a number is treated as no change.
pub fn parse_change_percent(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => 0.0,
    }
}

pub const MAX_SYMBOL_LEN: usize = 10;

/// Normalize a caller-supplied ticker: trimmed, uppercased, at most
/// `MAX_SYMBOL_LEN` characters from `A-Z 0-9 . ^ -`.
pub fn validate_symbol(raw: &str) -> Result<String, String> {
    let symbol = raw.trim().to_uppercase();

    if symbol.is_empty() {
        return Err("symbol must not be empty".to_string());
    }
    if symbol.chars().count() > MAX_SYMBOL_LEN {
        return Err(format!("symbol longer than {} characters", MAX_SYMBOL_LEN));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '^' | '-'))
    {
        return Err(format!("symbol '{}' contains invalid characters", symbol));
    }

    Ok(symbol)
}
