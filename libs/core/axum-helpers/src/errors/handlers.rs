use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Fallback handler for unknown routes.
pub async fn not_found() -> Response {
    let body = Json(ErrorResponse::new(
        ErrorCode::NotFound,
        ErrorCode::NotFound.default_message(),
    ));

    (StatusCode::NOT_FOUND, body).into_response()
}

/// Gives the bare 408 produced by the timeout layer the standard error body.
///
/// Every other response passes through untouched.
pub async fn timeout_body(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    tracing::warn!(
        error_code = ErrorCode::RequestTimeout.code(),
        "Request timed out"
    );
    let body = Json(ErrorResponse::new(
        ErrorCode::RequestTimeout,
        ErrorCode::RequestTimeout.default_message(),
    ));

    (StatusCode::REQUEST_TIMEOUT, body).into_response()
}
