use std::sync::Arc;

use crate::services::quote_service::QuoteFetcher;

#[derive(Clone)]
pub struct AppState {
    pub quote_fetcher: Arc<QuoteFetcher>,
}
