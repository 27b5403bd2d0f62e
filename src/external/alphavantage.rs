use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::{parse_change_percent, Quote};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct AvGlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<AvGlobalQuote>,

    // Throttled requests come back as 200 with one of these:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    // { "Information": "... rate limit is 25 requests per day ..." }
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,

    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvGlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

fn quote_from_response(
    requested: &str,
    body: AvGlobalQuoteResponse,
) -> Result<Quote, QuoteProviderError> {
    if body.note.is_some() || body.information.is_some() {
        return Err(QuoteProviderError::RateLimited);
    }

    if let Some(msg) = body.error_message {
        return Err(QuoteProviderError::BadResponse(msg));
    }

    let quote = body
        .global_quote
        .ok_or_else(|| QuoteProviderError::BadResponse("missing Global Quote".into()))?;

    // Unknown symbols yield `"Global Quote": {}`
    let price = quote
        .price
        .ok_or_else(|| QuoteProviderError::BadResponse(format!("empty quote for {}", requested)))?
        .trim()
        .parse::<f64>()
        .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

    let change_percent = quote
        .change_percent
        .as_deref()
        .map(parse_change_percent)
        .unwrap_or(0.0);

    Ok(Quote::new(
        quote.symbol.unwrap_or_else(|| requested.to_string()),
        price,
        change_percent,
    ))
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(QuoteProviderError::MissingApiKey("ALPHAVANTAGE_API_KEY"))?;

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| QuoteProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(QuoteProviderError::BadResponse(format!("HTTP {}", status)));
        }

        let body = resp
            .json::<AvGlobalQuoteResponse>()
            .await
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        quote_from_response(symbol, body)
    }

    fn name(&self) -> &'static str {
        "alphavantage"
    }
}
