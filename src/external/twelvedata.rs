use crate::external::quote_provider::{QuoteProvider, QuoteProviderError};
use crate::models::{parse_change_percent, Quote};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.twelvedata.com/quote";

pub struct TwelveDataProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl TwelveDataProvider {
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
struct TwelveDataQuoteResponse {
    symbol: Option<String>,
    close: Option<String>,
    percent_change: Option<String>,

    // Error handling
    status: Option<String>,
    message: Option<String>,
    code: Option<u32>,
}

fn quote_from_response(
    requested: &str,
    body: TwelveDataQuoteResponse,
) -> Result<Quote, QuoteProviderError> {
    if body.status.as_deref() == Some("error") {
        let msg = body.message.unwrap_or_default();
        if body.code == Some(429) || msg.contains("API rate limit") || msg.contains("credits") {
            return Err(QuoteProviderError::RateLimited);
        }
        return Err(QuoteProviderError::BadResponse(msg));
    }

    let price = body
        .close
        .ok_or_else(|| QuoteProviderError::BadResponse("missing close in quote".into()))?
        .trim()
        .parse::<f64>()
        .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

    let change_percent = body
        .percent_change
        .as_deref()
        .map(parse_change_percent)
        .unwrap_or(0.0);

    Ok(Quote::new(
        body.symbol.unwrap_or_else(|| requested.to_string()),
        price,
        change_percent,
    ))
}

#[async_trait]
impl QuoteProvider for TwelveDataProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(QuoteProviderError::MissingApiKey("TWELVEDATA_API_KEY"))?;

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("symbol", symbol), ("apikey", api_key)])
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

        let body: TwelveDataQuoteResponse = resp
            .json()
            .await
            .map_err(|e| QuoteProviderError::Parse(e.to_string()))?;

        quote_from_response(symbol, body)
    }

    fn name(&self) -> &'static str {
        "twelvedata"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Quote, QuoteProviderError> {
        let body: TwelveDataQuoteResponse = serde_json::from_str(json).unwrap();
        quote_from_response("SPY", body)
    }

    #[test]
    fn test_parses_quote() {
        let quote = parse(
            r#"{
                "symbol": "SPY",
                "name": "SPDR S&P 500 ETF Trust",
                "close": "505.12000",
                "change": "-2.3",
                "percent_change": "-0.45316"
            }"#,
        )
        .unwrap();

        assert_eq!(quote.symbol, "SPY");
        assert_eq!(quote.price, 505.12);
        assert_eq!(quote.change_percent, -0.45316);
    }

    #[test]
    fn test_credit_exhaustion_is_rate_limited() {
        let err = parse(
            r#"{ "code": 429, "message": "You have run out of API credits for the current minute.", "status": "error" }"#,
        )
        .unwrap_err();
        assert!(matches!(err, QuoteProviderError::RateLimited));
    }

    #[test]
    fn test_unknown_symbol_is_bad_response() {
        let err = parse(
            r#"{ "code": 404, "message": "symbol not found: XXXX", "status": "error" }"#,
        )
        .unwrap_err();
        assert!(matches!(err, QuoteProviderError::BadResponse(_)));
    }

    /// Local upstream answering every request with `status`
    async fn serve_status(status: StatusCode) -> String {
        let app = axum::Router::new().fallback(move || async move { (status, "{}") });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/quote", addr)
    }

    fn provider_at(base_url: String) -> TwelveDataProvider {
        TwelveDataProvider::new(reqwest::Client::new(), Some("test-key".into()))
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_http_503_is_bad_response() {
        let provider = provider_at(serve_status(StatusCode::SERVICE_UNAVAILABLE).await);
        let err = provider.fetch_quote("SPY").await.unwrap_err();
        assert!(matches!(err, QuoteProviderError::BadResponse(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_http_429_is_rate_limited() {
        let provider = provider_at(serve_status(StatusCode::TOO_MANY_REQUESTS).await);
        let err = provider.fetch_quote("SPY").await.unwrap_err();
        assert!(matches!(err, QuoteProviderError::RateLimited));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let provider = TwelveDataProvider::new(reqwest::Client::new(), None)
            .with_base_url("http://127.0.0.1:9");
        let err = provider.fetch_quote("SPY").await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_close_is_bad_response() {
        let err = parse(r#"{ "symbol": "SPY" }"#).unwrap_err();
        assert!(matches!(err, QuoteProviderError::BadResponse(_)));
    }
}
