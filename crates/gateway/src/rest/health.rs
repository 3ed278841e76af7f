//! Health check endpoint

use axum::{extract::State, http::StatusCode, Json};
use courier_cache::CacheStore;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::state::GatewayState;

const CONNECTED: &str = "connected";
const DOWN: &str = "down";

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub cache: String,
}

/// Report liveness of the store and cache dependencies
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthResponse),
        (status = 503, description = "A dependency is down", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(state): State<GatewayState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = match courier_database::ping(&state.pool).await {
        Ok(()) => CONNECTED,
        Err(error) => {
            warn!(%error, "database health check failed");
            DOWN
        }
    };

    let cache = match state.cache.ping().await {
        Ok(()) => CONNECTED,
        Err(error) => {
            warn!(%error, "cache health check failed");
            DOWN
        }
    };

    let healthy = database == CONNECTED && cache == CONNECTED;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            database: database.to_string(),
            cache: cache.to_string(),
        }),
    )
}
