use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use fare_server::aggregator::Aggregator;
use fare_server::cache::ResultCache;
use fare_server::config::AppConfig;
use fare_server::providers::default_providers;
use fare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Providers in the order they are reported and tie-broken
    let providers = default_providers(&config.provider).expect("Failed to create providers");
    let cache = Arc::new(ResultCache::new(&config.cache));
    let aggregator = Aggregator::new(providers, cache);

    info!(
        providers = ?aggregator.provider_names(),
        cache_ttl_secs = aggregator.cache().ttl().as_secs(),
        provider_timeout_secs = config.provider.timeout_secs,
        "Aggregator ready"
    );

    let state = AppState::new(aggregator).with_max_services(config.max_services);
    let app = create_router(state);

    let addr = config.bind_addr;
    info!(%addr, "Bus fare server listening");
    info!("  GET  /health       - Health check");
    info!("  POST /api/search   - List services on a route");
    info!("  POST /api/compare  - Compare fares across sites");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
