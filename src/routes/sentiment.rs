use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{ClassifyBatchRequest, ClassifyRequest, TextSentiment};
use crate::services::text_sentiment_service;
use crate::state::AppState;

const MAX_BATCH_SIZE: usize = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/classify", post(classify))
        .route("/classify/batch", post(classify_batch))
}

/// POST /api/sentiment/classify
pub async fn classify(Json(request): Json<ClassifyRequest>) -> Json<TextSentiment> {
    let result = text_sentiment_service::score_text(&request.text);
    info!(
        "POST /api/sentiment/classify - {} chars -> {} ({})",
        request.text.len(),
        result.sentiment,
        result.score
    );
    Json(result)
}

/// POST /api/sentiment/classify/batch
///
/// Results are returned in input order.
pub async fn classify_batch(
    Json(request): Json<ClassifyBatchRequest>,
) -> Result<Json<Vec<TextSentiment>>, AppError> {
    if request.texts.is_empty() {
        return Err(AppError::Validation("texts must not be empty".to_string()));
    }
    if request.texts.len() > MAX_BATCH_SIZE {
        return Err(AppError::Validation(format!(
            "at most {} texts per batch, got {}",
            MAX_BATCH_SIZE,
            request.texts.len()
        )));
    }

    info!("POST /api/sentiment/classify/batch - {} texts", request.texts.len());
    let results: Vec<TextSentiment> = request
        .texts
        .iter()
        .map(|text| text_sentiment_service::score_text(text))
        .collect();

    Ok(Json(results))
}
