//! Notification preference REST endpoints.
//!
//! Every handler authorizes against the path's user id before touching the
//! coordinator, so cache and store are only ever reached on behalf of the
//! resource owner (or an internal caller).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use courier_auth::{authorize, Caller};
use courier_database::{CreatePreferenceRequest, NotificationPreference, UpdatePreferenceRequest};

use crate::error::GatewayResult;
use crate::state::GatewayState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePreferenceBody {
    pub notification_type: String,
    pub channel: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePreferenceBody {
    pub enabled: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreferenceResponse {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: String,
    pub channel: String,
    pub enabled: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<NotificationPreference> for PreferenceResponse {
    fn from(preference: NotificationPreference) -> Self {
        Self {
            id: preference.id,
            user_id: preference.user_id,
            notification_type: preference.notification_type,
            channel: preference.channel,
            enabled: preference.enabled,
            created_at: preference.created_at,
            updated_at: preference.updated_at,
        }
    }
}

/// List a user's notification preferences
#[utoipa::path(
    get,
    path = "/users/{id}/preferences",
    tag = "Preferences",
    params(("id" = i64, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Preferences ordered by id", body = [PreferenceResponse]),
        (status = 403, description = "Not the caller's resources", body = crate::rest::ErrorResponse)
    )
)]
pub async fn list_preferences(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
) -> GatewayResult<Json<Vec<PreferenceResponse>>> {
    authorize(&caller, id)?;

    let preferences = state.preference_service().get_preferences(id).await?;
    Ok(Json(preferences.into_iter().map(Into::into).collect()))
}

/// Create a notification preference
#[utoipa::path(
    post,
    path = "/users/{id}/preferences",
    tag = "Preferences",
    params(("id" = i64, Path, description = "Owning user id")),
    request_body = CreatePreferenceBody,
    responses(
        (status = 201, description = "Preference created", body = PreferenceResponse),
        (status = 403, description = "Not the caller's resources", body = crate::rest::ErrorResponse),
        (status = 409, description = "Preference already exists", body = crate::rest::ErrorResponse)
    )
)]
pub async fn create_preference(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
    Json(payload): Json<CreatePreferenceBody>,
) -> GatewayResult<(StatusCode, Json<PreferenceResponse>)> {
    authorize(&caller, id)?;

    let preference = state
        .preference_service()
        .create_preference(
            id,
            CreatePreferenceRequest {
                notification_type: payload.notification_type,
                channel: payload.channel,
                enabled: payload.enabled,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(preference.into())))
}

/// Fetch a single notification preference
#[utoipa::path(
    get,
    path = "/users/{id}/preferences/{pref_id}",
    tag = "Preferences",
    params(
        ("id" = i64, Path, description = "Owning user id"),
        ("pref_id" = i64, Path, description = "Preference id")
    ),
    responses(
        (status = 200, description = "Preference record", body = PreferenceResponse),
        (status = 404, description = "Preference not found", body = crate::rest::ErrorResponse)
    )
)]
pub async fn get_preference(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path((id, pref_id)): Path<(i64, i64)>,
) -> GatewayResult<Json<PreferenceResponse>> {
    authorize(&caller, id)?;

    let preference = state
        .preference_service()
        .get_preference(id, pref_id)
        .await?;
    Ok(Json(preference.into()))
}

/// Update a notification preference
#[utoipa::path(
    put,
    path = "/users/{id}/preferences/{pref_id}",
    tag = "Preferences",
    params(
        ("id" = i64, Path, description = "Owning user id"),
        ("pref_id" = i64, Path, description = "Preference id")
    ),
    request_body = UpdatePreferenceBody,
    responses(
        (status = 200, description = "Updated preference", body = PreferenceResponse),
        (status = 404, description = "Preference not found", body = crate::rest::ErrorResponse)
    )
)]
pub async fn update_preference(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path((id, pref_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdatePreferenceBody>,
) -> GatewayResult<Json<PreferenceResponse>> {
    authorize(&caller, id)?;

    let preference = state
        .preference_service()
        .update_preference(
            id,
            pref_id,
            UpdatePreferenceRequest {
                enabled: payload.enabled,
            },
        )
        .await?;

    Ok(Json(preference.into()))
}

/// Delete a notification preference
#[utoipa::path(
    delete,
    path = "/users/{id}/preferences/{pref_id}",
    tag = "Preferences",
    params(
        ("id" = i64, Path, description = "Owning user id"),
        ("pref_id" = i64, Path, description = "Preference id")
    ),
    responses(
        (status = 204, description = "Preference deleted"),
        (status = 404, description = "Preference not found", body = crate::rest::ErrorResponse)
    )
)]
pub async fn delete_preference(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path((id, pref_id)): Path<(i64, i64)>,
) -> GatewayResult<StatusCode> {
    authorize(&caller, id)?;

    state
        .preference_service()
        .delete_preference(id, pref_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
