//! User REST endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use courier_auth::{authorize, Caller};
use courier_database::{CreateUserRequest, UpdateUserRequest, User};

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserBody {
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Username or email already taken", body = crate::rest::ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<GatewayState>,
    Json(payload): Json<RegisterRequest>,
) -> GatewayResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service()
        .register(CreateUserRequest {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// The authenticated caller's own record
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's user record", body = UserResponse),
        (status = 401, description = "Not authenticated", body = crate::rest::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
) -> GatewayResult<Json<UserResponse>> {
    let user_id = caller.user_id().ok_or_else(|| {
        GatewayError::AuthenticationFailed("User not authenticated".to_string())
    })?;

    let user = state.user_service().get_user(user_id).await?;
    Ok(Json(user.into()))
}

/// Fetch a user record
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User record", body = UserResponse),
        (status = 403, description = "Not the caller's record", body = crate::rest::ErrorResponse),
        (status = 404, description = "User not found", body = crate::rest::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
) -> GatewayResult<Json<UserResponse>> {
    authorize(&caller, id)?;

    let user = state.user_service().get_user(id).await?;
    Ok(Json(user.into()))
}

/// Update a user record
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated user record", body = UserResponse),
        (status = 403, description = "Not the caller's record", body = crate::rest::ErrorResponse),
        (status = 409, description = "Username or email already taken", body = crate::rest::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<GatewayState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserBody>,
) -> GatewayResult<Json<UserResponse>> {
    authorize(&caller, id)?;

    let user = state
        .user_service()
        .update_user(
            id,
            UpdateUserRequest {
                username: payload.username,
                email: payload.email,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(user.into()))
}
