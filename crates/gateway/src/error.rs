//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            GatewayError::AuthorizationFailed(_) => StatusCode::FORBIDDEN,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = json!({
            "error": status.as_str(),
            "message": self.to_string(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Convert from domain error types
impl From<courier_users::UserError> for GatewayError {
    fn from(error: courier_users::UserError) -> Self {
        use courier_users::UserError;
        match error {
            UserError::UserNotFound => GatewayError::NotFound("User not found".to_string()),
            UserError::UsernameTaken => {
                GatewayError::Conflict("Username already taken".to_string())
            }
            UserError::EmailTaken => GatewayError::Conflict("Email already taken".to_string()),
            UserError::InvalidUserData(msg) => GatewayError::InvalidRequest(msg),
            UserError::InvalidCredentials => {
                GatewayError::AuthenticationFailed("Invalid credentials".to_string())
            }
            UserError::PasswordHashingFailed => {
                GatewayError::InternalError("Password hashing failed".to_string())
            }
            UserError::DatabaseError(msg) => GatewayError::StoreUnavailable(msg),
        }
    }
}

impl From<courier_users::PreferenceError> for GatewayError {
    fn from(error: courier_users::PreferenceError) -> Self {
        use courier_users::PreferenceError;
        match error {
            PreferenceError::NotFound => {
                GatewayError::NotFound("Preference not found".to_string())
            }
            PreferenceError::Conflict => {
                GatewayError::Conflict("Preference already exists".to_string())
            }
            PreferenceError::InvalidPreferenceData(msg) => GatewayError::InvalidRequest(msg),
            PreferenceError::DatabaseError(msg) => GatewayError::StoreUnavailable(msg),
        }
    }
}

impl From<courier_auth::TokenError> for GatewayError {
    fn from(error: courier_auth::TokenError) -> Self {
        use courier_auth::TokenError;
        match error {
            TokenError::Invalid => GatewayError::AuthenticationFailed("Invalid token".to_string()),
            TokenError::Expired => GatewayError::AuthenticationFailed("Token expired".to_string()),
            TokenError::CreationFailed(msg) => GatewayError::InternalError(msg),
        }
    }
}

impl From<courier_auth::AuthzError> for GatewayError {
    fn from(error: courier_auth::AuthzError) -> Self {
        GatewayError::AuthorizationFailed(error.to_string())
    }
}
