use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use axum_helpers::{
    ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::RecommendResult;
use crate::models::{Recommendation, RecommendRequest, RecommendResponse, SupportFlag};
use crate::service::RecommendationService;

pub const TAG: &str = "recommendations";

/// OpenAPI documentation for the recommendation API
#[derive(OpenApi)]
#[openapi(
    paths(recommend, recommend_by_query),
    components(
        schemas(RecommendRequest, RecommendResponse, Recommendation, SupportFlag),
        responses(
            BadRequestValidationResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = TAG, description = "Assessment recommendations for a hiring query")
    )
)]
pub struct ApiDoc;

/// Create the recommendation router
pub fn router(service: RecommendationService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/recommend", get(recommend_by_query).post(recommend))
        .with_state(shared_service)
}

/// Recommend assessments for a JSON request body
#[utoipa::path(
    post,
    path = "/recommend",
    tag = TAG,
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Ranked assessments, best first", body = RecommendResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn recommend(
    State(service): State<Arc<RecommendationService>>,
    ValidatedJson(request): ValidatedJson<RecommendRequest>,
) -> RecommendResult<Json<RecommendResponse>> {
    let recommended_assessments = service.recommend(&request.query, request.top_k).await?;
    Ok(Json(RecommendResponse {
        recommended_assessments,
    }))
}

/// Recommend assessments from query-string parameters
#[utoipa::path(
    get,
    path = "/recommend",
    tag = TAG,
    params(RecommendRequest),
    responses(
        (status = 200, description = "Ranked assessments, best first", body = RecommendResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn recommend_by_query(
    State(service): State<Arc<RecommendationService>>,
    ValidatedQuery(request): ValidatedQuery<RecommendRequest>,
) -> RecommendResult<Json<RecommendResponse>> {
    let recommended_assessments = service.recommend(&request.query, request.top_k).await?;
    Ok(Json(RecommendResponse {
        recommended_assessments,
    }))
}
