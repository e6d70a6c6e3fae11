//! Prometheus metrics for the recommender service.
//!
//! - recorder installation and the `/metrics` handler
//! - HTTP request metrics middleware
//! - recommendation pipeline metrics ([`RecommendationMetrics`])
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, metrics_middleware};
//!
//! init_metrics()?;
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler))
//!     .layer(axum::middleware::from_fn(metrics_middleware));
//! ```

pub mod middleware;
pub mod recommendations;

pub use middleware::metrics_middleware;
pub use recommendations::{PreprocessOutcome, RecommendationMetrics, RequestOutcome};

pub use metrics_exporter_prometheus::BuildError;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Idempotent: later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

/// Get the metrics handle (None until [`init_metrics`] succeeded)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for `GET /metrics`
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP 4xx/5xx responses"
    );

    describe_counter!(
        "recommendations_requests_total",
        "Recommendation requests by outcome"
    );
    describe_histogram!(
        "recommendations_results_returned",
        "Number of assessments returned per request"
    );
    describe_counter!(
        "query_preprocessing_total",
        "Query preprocessing attempts by outcome"
    );
    describe_histogram!(
        "embedding_duration_seconds",
        "Time spent encoding a query"
    );
    describe_gauge!("catalog_entries", "Assessments loaded into the catalog");
}
