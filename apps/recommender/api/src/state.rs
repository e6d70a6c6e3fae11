//! Application state management.

use domain_recommendations::RecommendationService;

/// Shared application state.
///
/// Cloned per handler; the service only holds `Arc`s, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Loaded catalog, index and model clients
    pub service: RecommendationService,
}
