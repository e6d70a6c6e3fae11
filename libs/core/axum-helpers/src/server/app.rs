use super::shutdown::shutdown_signal;
use crate::errors::handlers::{not_found, timeout_body};
use crate::http::{create_cors_layer, security_headers};
use axum::{Router, http::StatusCode, middleware};
use core_config::server::ServerConfig;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Wraps the API routes with documentation and cross-cutting middleware.
///
/// - Swagger UI at `/swagger-ui`, OpenAPI document at `/api-docs/openapi.json`
/// - JSON 404 fallback
/// - Request timeout (`ServerConfig::request_timeout`, answered with a JSON 408)
/// - Request tracing, security headers, response compression
/// - CORS, only when `ServerConfig::cors_allowed_origins` is set
///
/// Routes keep their own state; this function only layers them.
///
/// # Errors
/// Returns `InvalidInput` if the configured CORS origins do not parse.
pub fn create_router<T>(routes: Router, server: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server.request_timeout,
        ))
        .layer(middleware::map_response(timeout_body))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new());

    if let Some(origins) = &server.cors_allowed_origins {
        info!("CORS configured with allowed origins: {}", origins);
        router = router.layer(create_cors_layer(origins)?);
    }

    Ok(router)
}

/// Binds the configured address and serves until SIGINT/SIGTERM.
pub async fn serve(router: Router, server: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi()]
    struct EmptyDoc;

    fn routes() -> Router {
        Router::new().route("/ping", get(|| async { "pong" }))
    }

    #[tokio::test]
    async fn test_routes_are_mounted_at_root() {
        let app = create_router::<EmptyDoc>(routes(), &ServerConfig::default()).unwrap();
        let response = app
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_falls_back_to_json_404() {
        let app = create_router::<EmptyDoc>(routes(), &ServerConfig::default()).unwrap();
        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_timeout_answers_with_error_body() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let server = ServerConfig {
            request_timeout: Duration::from_millis(20),
            ..ServerConfig::default()
        };

        let app = create_router::<EmptyDoc>(slow, &server).unwrap();
        let response = app
            .oneshot(Request::get("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "REQUEST_TIMEOUT");
        assert_eq!(body["code"], 1005);
    }

    #[test]
    fn test_invalid_cors_is_rejected() {
        let server = ServerConfig {
            cors_allowed_origins: Some(",".to_string()),
            ..ServerConfig::default()
        };
        assert!(create_router::<EmptyDoc>(routes(), &server).is_err());
    }
}
