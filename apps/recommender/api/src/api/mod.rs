use axum::{Router, middleware, routing::get};
use domain_recommendations::handlers;
use observability::{metrics_handler, metrics_middleware};

pub mod health;

/// Creates the API routes:
/// - GET/POST /recommend
/// - GET /metrics
///
/// Returns a stateless Router (sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .merge(handlers::router(state.service.clone()))
        .route_layer(middleware::from_fn(metrics_middleware))
        .route("/metrics", get(metrics_handler))
}

/// Creates a router with the /ready endpoint that probes the embedding model.
///
/// This router has state applied and can be merged with the stateless app router
/// from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
