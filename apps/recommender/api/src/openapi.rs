use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::HealthResponse)
    ),
    info(
        title = "Assessment Recommender API",
        version = "0.1.0",
        description = "Recommends assessments from the product catalog for a free-text hiring query"
    )
)]
struct BaseApiDoc;

/// Combined API documentation served at `/api-docs/openapi.json`
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseApiDoc::openapi();
        doc.merge(domain_recommendations::ApiDoc::openapi());
        doc
    }
}
