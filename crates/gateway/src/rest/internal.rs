//! Internal service-to-service endpoints.
//!
//! This route family is mounted without the bearer middleware: callers are
//! classified as [`Caller::Internal`], a pre-authenticated capability. The
//! deployment must keep these paths reachable only from the trusted network
//! segment; nothing here re-checks that.

use axum::{
    extract::{Path, State},
    Json,
};

use courier_auth::{authorize, Caller};

use crate::error::GatewayResult;
use crate::rest::preferences::PreferenceResponse;
use crate::rest::users::UserResponse;
use crate::state::GatewayState;

/// Fetch a user record on behalf of another service
#[utoipa::path(
    get,
    path = "/internal/users/{id}",
    tag = "Internal",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User record", body = UserResponse),
        (status = 404, description = "User not found", body = crate::rest::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> GatewayResult<Json<UserResponse>> {
    authorize(&Caller::Internal, id)?;

    let user = state.user_service().get_user(id).await?;
    Ok(Json(user.into()))
}

/// Fetch a user's preferences on behalf of another service
#[utoipa::path(
    get,
    path = "/internal/users/{id}/preferences",
    tag = "Internal",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Preferences ordered by id", body = [PreferenceResponse])
    )
)]
pub async fn get_preferences(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> GatewayResult<Json<Vec<PreferenceResponse>>> {
    authorize(&Caller::Internal, id)?;

    let preferences = state.preference_service().get_preferences(id).await?;
    Ok(Json(preferences.into_iter().map(Into::into).collect()))
}
