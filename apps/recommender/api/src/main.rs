use axum_helpers::{create_router, health_router, serve};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_recommendations::{
    AssessmentStore, GeminiShortener, OpenAiEmbedder, RecommendationService,
};
use eyre::WrapErr;
use observability::RecommendationMetrics;
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);
    info!(
        name = config.app.name,
        version = config.app.version,
        "Starting recommender API"
    );

    observability::init_metrics().wrap_err("Failed to install Prometheus recorder")?;

    // Catalog and index are read with blocking file IO
    let store_config = config.store.clone();
    let store = tokio::task::spawn_blocking(move || AssessmentStore::load(&store_config))
        .await
        .wrap_err("Catalog loading task failed")?
        .wrap_err("Failed to load catalog and index")?;
    RecommendationMetrics::set_catalog_entries(store.len());

    let embedder = OpenAiEmbedder::new(config.embedding.clone())?;
    info!(
        model = embedder.model(),
        url = %config.embedding.base_url,
        "Embedding client configured"
    );

    let mut service =
        RecommendationService::new(Arc::new(store), Arc::new(embedder), config.options.clone());

    if let Some(gemini) = &config.gemini {
        info!(
            model = %gemini.model,
            timeout_ms = config.options.preprocess_timeout.as_millis() as u64,
            "Query preprocessing enabled"
        );
        service = service.with_shortener(Arc::new(GeminiShortener::new(gemini.clone())?));
    }

    // The model must answer and match the index dimension before we take traffic
    service
        .probe_embedder()
        .await
        .wrap_err("Embedding model check failed")?;

    let state = AppState { config, service };

    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    // - /health: liveness
    // - /ready: embedder probe
    let app = router
        .merge(health_router())
        .merge(api::ready_router(state.clone()));

    serve(app, &state.config.server)
        .await
        .wrap_err("Server error")?;

    info!("Recommender API shutdown complete");
    Ok(())
}
