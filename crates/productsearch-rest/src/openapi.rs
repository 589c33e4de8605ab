//! OpenAPI documentation.

use crate::controllers::{health_controller, product_search_controller};
use productsearch_core::{ErrorResponse, FieldError};
use productsearch_service::{AddUserRequest, PersonResponse};
use utoipa::OpenApi;

/// OpenAPI documentation for the Product Search API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Search API",
        version = "1.0.0",
        description = "Person registration and lookup"
    ),
    paths(
        health_controller::health_check,
        health_controller::readiness_check,
        health_controller::liveness_check,
        product_search_controller::ping,
        product_search_controller::add_user,
        product_search_controller::add_user_from_query,
        product_search_controller::get_user_by_email,
    ),
    components(
        schemas(
            health_controller::HealthResponse,
            health_controller::ReadinessResponse,
            health_controller::ComponentHealth,
            AddUserRequest,
            PersonResponse,
            ErrorResponse,
            FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "productSearch", description = "Person registration and lookup")
    )
)]
pub struct ApiDoc;
