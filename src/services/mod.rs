pub mod failure_cache;
pub mod mood_service;
pub mod quote_cache;
pub mod quote_service;
pub mod text_sentiment_service;
