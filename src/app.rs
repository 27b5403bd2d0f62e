use axum::Router;
use tower_http::cors::CorsLayer;

use crate::errors::AppError;
use crate::routes::{health, market, sentiment};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/market", market::router())
        .nest("/api/sentiment", sentiment::router())
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
