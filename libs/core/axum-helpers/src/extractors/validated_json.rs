//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Rejections are reported through [`AppError`], so a malformed body and a
/// failed validation share the standard error body.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Search {
///     #[validate(length(min = 1))]
///     query: String,
/// }
///
/// async fn search(ValidatedJson(payload): ValidatedJson<Search>) -> String {
///     payload.query
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
