//! Readiness check against the embedding model.

use crate::state::AppState;
use axum::{extract::State, response::Response};
use axum_helpers::{HealthCheckFuture, run_health_checks};

/// Readiness check endpoint.
///
/// Encodes a probe string and checks the vector fits the loaded index, so a
/// swapped or unreachable model shows up as `"embedder": "disconnected"`.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "embedder",
        Box::pin(async {
            state
                .service
                .probe_embedder()
                .await
                .map_err(|e| format!("Embedder probe failed: {}", e))
        }),
    )];

    run_health_checks(checks).await
}
