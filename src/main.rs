use std::sync::Arc;

use tech_message_manager::{
    api::{build_router, AppState},
    catalog::{CatalogService, InMemoryCatalog},
    config::Config,
    engine::{FieldWeightPolicy, FuzzyRanker, PatternMatcher, SearchEngine},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    init_tracing(&config);

    tracing::info!(
        "Starting Tech Message Manager v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize the compiled-pattern cache shared by writes and searches
    let matcher = Arc::new(PatternMatcher::new());

    // Initialize catalog storage and administration service
    let store = Arc::new(InMemoryCatalog::new());
    let catalog = Arc::new(CatalogService::new(store.clone(), matcher.clone()));
    tracing::info!("Catalog store initialized");

    // Seed the catalog if configured
    if let Some(seed_path) = &config.catalog.seed_path {
        match catalog.seed_from_file(seed_path).await {
            Ok(count) => tracing::info!(count, "Catalog seed loaded"),
            Err(e) => {
                tracing::warn!(error = %e, "Catalog seed failed to load");
                tracing::warn!("Continuing with an empty catalog");
            }
        }
    }

    // Initialize the search engine with the configured scoring policy
    let ranker = FuzzyRanker::new(Arc::new(FieldWeightPolicy::new(
        config.search.weights.clone(),
    )));
    let search = Arc::new(SearchEngine::new(store, matcher, ranker));
    tracing::info!("Search engine initialized");

    // Build HTTP router
    let app_state = AppState::new(catalog, search);
    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Search: http://{}/v1/tech-messages/search", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}

fn init_tracing(config: &Config) {
    let default_filter = format!(
        "tech_message_manager={},tower_http=info",
        config.observability.log_level
    );

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
