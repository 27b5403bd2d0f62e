//! Drives the HTTP surface in-process against stub quote providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use marketmood_backend::app::create_app;
use marketmood_backend::config::QuoteConfig;
use marketmood_backend::external::quote_provider::{QuoteProvider, QuoteProviderError};
use marketmood_backend::models::Quote;
use marketmood_backend::services::quote_service::QuoteFetcher;
use marketmood_backend::state::AppState;

struct StubProvider {
    change_percent: Option<f64>,
    calls: AtomicUsize,
}

#[async_trait]
impl QuoteProvider for StubProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.change_percent {
            Some(change) => Ok(Quote::new(symbol, 500.0, change)),
            None => Err(QuoteProviderError::BadResponse("HTTP 503".into())),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn app_with(change_percent: Option<f64>) -> (Router, Arc<StubProvider>) {
    let provider = Arc::new(StubProvider {
        change_percent,
        calls: AtomicUsize::new(0),
    });
    let fetcher = QuoteFetcher::new(provider.clone(), &QuoteConfig::default());
    let state = AppState {
        quote_fetcher: Arc::new(fetcher),
    };
    (create_app(state), provider)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn mood_reflects_reference_quote() {
    let (app, _) = app_with(Some(1.5));

    let (status, body) = send(&app, get("/api/market/mood")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "value": 90, "status": "Extreme Greed", "change": 1.5 }));
}

#[tokio::test]
async fn mood_falls_back_to_neutral_when_upstream_fails() {
    let (app, _) = app_with(None);

    let (status, body) = send(&app, get("/api/market/mood")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "value": 50, "status": "Neutral", "change": 0.0 }));
}

#[tokio::test]
async fn repeated_mood_requests_hit_upstream_once() {
    let (app, provider) = app_with(Some(-0.6));

    let (_, first) = send(&app, get("/api/market/mood?symbol=QQQ")).await;
    let (_, second) = send(&app, get("/api/market/mood?symbol=QQQ")).await;

    assert_eq!(first, second);
    assert_eq!(first["status"], "Fear");
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn mood_rejects_malformed_symbol_without_upstream_call() {
    let (app, provider) = app_with(Some(0.5));

    for uri in [
        "/api/market/mood?symbol=SPY%3BDROP",
        "/api/market/mood?symbol=ABCDEFGHIJKLMNOP",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
    }

    // Blank means the reference symbol
    let (status, _) = send(&app, get("/api/market/mood?symbol=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn classify_returns_label_and_matches() {
    let (app, _) = app_with(None);

    let (status, body) = send(
        &app,
        post_json("/api/sentiment/classify", json!({ "text": "Stocks surge to record high" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "positive");
    assert_eq!(body["negative_matches"], json!([]));
}

#[tokio::test]
async fn classify_batch_preserves_order() {
    let (app, _) = app_with(None);

    let (status, body) = send(
        &app,
        post_json(
            "/api/sentiment/classify/batch",
            json!({ "texts": [
                "Markets crash amid inflation crisis",
                "Market closed for holiday",
                "Stocks surge to record high"
            ] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["sentiment"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["negative", "neutral", "positive"]);
}

#[tokio::test]
async fn classify_batch_rejects_empty_and_oversized() {
    let (app, _) = app_with(None);

    let (status, _) = send(&app, post_json("/api/sentiment/classify/batch", json!({ "texts": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let texts: Vec<String> = (0..101).map(|i| format!("headline {}", i)).collect();
    let (status, body) = send(&app, post_json("/api/sentiment/classify/batch", json!({ "texts": texts }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("100"));
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let (app, _) = app_with(None);

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = send(&app, get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}
