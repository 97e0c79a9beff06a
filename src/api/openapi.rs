//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visitor Intake API",
        version = "0.1.0",
        description = "Overnight visitor registration for student residences",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        health::health_check,
        health::readiness_check,
        visits::submit_visit,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::models::submission::SubmitVisitForm,
            crate::models::VisitSubmitted,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health and readiness probes"),
        (name = "visits", description = "Visitor registration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
