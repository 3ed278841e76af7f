//! # Courier Gateway Crate
//!
//! HTTP surface of the Courier backend: routing, bearer authentication,
//! error-to-status mapping, and the shared service state. Requests decoded
//! here are dispatched into the domain services in `courier-users`.

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export main types for convenience
pub use error::{GatewayError, GatewayResult};
pub use middleware::auth_middleware;
pub use state::GatewayState;

use axum::{http::Method, middleware as axum_middleware, Router};
use tower_http::cors::{Any, CorsLayer};

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers(Any);

    let router = rest::create_rest_routes(state)
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    // Serve OpenAPI docs in debug builds only.
    #[cfg(debug_assertions)]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::auth::login,
                rest::users::create_user,
                rest::users::me,
                rest::users::get_user,
                rest::users::update_user,
                rest::preferences::list_preferences,
                rest::preferences::create_preference,
                rest::preferences::get_preference,
                rest::preferences::update_preference,
                rest::preferences::delete_preference,
                rest::health::health_check,
                rest::internal::get_user,
                rest::internal::get_preferences,
            ),
            components(schemas(
                rest::auth::LoginRequest,
                rest::auth::LoginResponse,
                rest::users::RegisterRequest,
                rest::users::UpdateUserBody,
                rest::users::UserResponse,
                rest::preferences::CreatePreferenceBody,
                rest::preferences::UpdatePreferenceBody,
                rest::preferences::PreferenceResponse,
                rest::health::HealthResponse,
                rest::ErrorResponse,
            ))
        )]
        struct ApiDoc;

        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    };

    router
}
