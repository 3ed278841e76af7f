//! REST API endpoints for the gateway

pub mod auth;
pub mod health;
pub mod internal;
pub mod preferences;
pub mod users;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::middleware::auth_middleware;
use crate::state::GatewayState;

/// Error body shape returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Create all REST API routes.
///
/// Three groups with different trust levels: public routes (registration,
/// login, health), bearer-protected routes, and the internal family that is
/// only ever exposed to other services.
pub fn create_rest_routes(state: GatewayState) -> Router {
    let public = Router::new()
        .route("/users", post(users::create_user))
        .route("/login", post(auth::login))
        .route("/health", get(health::health_check));

    let protected = Router::new()
        .route("/users/me", get(users::me))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        .route(
            "/users/:id/preferences",
            get(preferences::list_preferences).post(preferences::create_preference),
        )
        .route(
            "/users/:id/preferences/:pref_id",
            get(preferences::get_preference)
                .put(preferences::update_preference)
                .delete(preferences::delete_preference),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let internal = Router::new()
        .route("/internal/users/:id", get(internal::get_user))
        .route(
            "/internal/users/:id/preferences",
            get(internal::get_preferences),
        );

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(internal)
        .with_state(state)
}
