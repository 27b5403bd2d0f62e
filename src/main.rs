use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use marketmood_backend::app;
use marketmood_backend::config::AppConfig;
use marketmood_backend::external;
use marketmood_backend::logging::{init_logging, LoggingConfig};
use marketmood_backend::services::quote_service::QuoteFetcher;
use marketmood_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    let provider = external::build_provider(&config.quote)
        .context("failed to build quote provider")?;
    tracing::info!(
        "📊 Using quote provider: {} (reference {}, cache {}s, timeout {}s)",
        provider.name(),
        config.quote.reference_symbol,
        config.quote.cache_ttl_secs,
        config.quote.http_timeout_secs
    );

    let state = AppState {
        quote_fetcher: Arc::new(QuoteFetcher::new(provider, &config.quote)),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Market mood backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
