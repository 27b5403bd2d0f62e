use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{validate_symbol, MoodResult};
use crate::services::mood_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mood", get(get_mood))
}

#[derive(Debug, Deserialize)]
pub struct MoodQueryParams {
    /// Ticker to derive the mood from (default: reference symbol)
    pub symbol: Option<String>,
}

/// GET /api/market/mood?symbol=SPY
///
/// An unreachable or unconfigured provider yields the neutral fallback; only a
/// malformed `symbol` is rejected.
pub async fn get_mood(
    Query(params): Query<MoodQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<MoodResult>, AppError> {
    let symbol = match params.symbol.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(validate_symbol(raw).map_err(|e| {
            warn!("GET /api/market/mood - rejected symbol: {}", e);
            AppError::Validation(e)
        })?),
        None => None,
    };

    info!(
        "GET /api/market/mood - symbol={}",
        symbol.as_deref().unwrap_or(state.quote_fetcher.default_symbol())
    );
    let mood = mood_service::get_mood(&state.quote_fetcher, symbol.as_deref()).await;
    Ok(Json(mood))
}
