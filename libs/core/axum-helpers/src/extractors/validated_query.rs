//! Query-string counterpart of [`ValidatedJson`](super::ValidatedJson).

use crate::errors::AppError;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state).await?;
        data.validate()?;
        Ok(ValidatedQuery(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ValidatedJson;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Search {
        #[validate(length(min = 2))]
        term: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/search",
            get(|ValidatedQuery(q): ValidatedQuery<Search>| async move { q.term })
                .post(|ValidatedJson(q): ValidatedJson<Search>| async move { q.term }),
        )
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_valid_query_passes() {
        let request = Request::get("/search?term=rust").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_query_is_bad_request() {
        let request = Request::get("/search?term=r").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);

        let request = Request::get("/search").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_json_body_is_validated() {
        let request = Request::post("/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"term":"x"}"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);

        let request = Request::post("/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"term":"xy"}"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }
}
