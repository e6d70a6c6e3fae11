use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Index error: {0}")]
    Index(String),

    /// The index and catalog disagree (row out of bounds, cardinality or
    /// dimension mismatch).
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Preprocessing error: {0}")]
    Preprocessing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type RecommendResult<T> = Result<T, RecommendError>;

impl From<ConfigError> for RecommendError {
    fn from(err: ConfigError) -> Self {
        RecommendError::Config(err.to_string())
    }
}

impl From<csv::Error> for RecommendError {
    fn from(err: csv::Error) -> Self {
        RecommendError::Catalog(err.to_string())
    }
}

/// Convert RecommendError to AppError for standardized HTTP error responses
impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Validation(msg) => AppError::BadRequest(msg),
            RecommendError::Integrity(msg) => AppError::Integrity(msg),
            RecommendError::Embedding(msg) => {
                AppError::ServiceUnavailable(format!("Embedding error: {}", msg))
            }
            RecommendError::Preprocessing(msg) => {
                AppError::ServiceUnavailable(format!("Preprocessing error: {}", msg))
            }
            RecommendError::Catalog(msg) => {
                AppError::InternalServerError(format!("Catalog error: {}", msg))
            }
            RecommendError::Index(msg) => {
                AppError::InternalServerError(format!("Index error: {}", msg))
            }
            RecommendError::Config(msg) => {
                AppError::InternalServerError(format!("Config error: {}", msg))
            }
        }
    }
}

impl IntoResponse for RecommendError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (RecommendError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (
                RecommendError::Integrity("row 9".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RecommendError::Embedding("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RecommendError::Catalog("bad csv".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err: RecommendError = ConfigError::MissingEnvVar("GEMINI_API_KEY".into()).into();
        assert!(matches!(err, RecommendError::Config(ref msg) if msg.contains("GEMINI_API_KEY")));
    }
}
