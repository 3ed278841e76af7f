//! Middleware for authentication and other cross-cutting concerns

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use courier_auth::Caller;

use crate::error::GatewayError;
use crate::state::GatewayState;

/// Authentication middleware that validates bearer tokens.
///
/// Rejects a missing or malformed Authorization header with 401 before any
/// handler or authorization logic runs. On success the verified caller
/// identity is stored in the request extensions.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            GatewayError::AuthenticationFailed(
                "Missing or malformed authorization header".to_string(),
            )
        })?;

    let user_id = state.token_service().verify(token)?;

    request.extensions_mut().insert(Caller::User(user_id));

    Ok(next.run(request).await)
}

/// Logging middleware for request/response logging
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
