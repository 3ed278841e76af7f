//! End-to-end tests for the gateway router

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use courier_cache::MemoryCache;
use courier_config::AppConfig;
use courier_database::run_migrations;
use courier_gateway::{create_router, GatewayState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

// Pooled in-memory SQLite gives every connection its own database, so the
// test pool is pinned to a single connection.
async fn test_router() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite://:memory:")
        .await
        .expect("Failed to create test database");
    run_migrations(&pool).await.expect("Failed to run migrations");

    let config = AppConfig::default();
    let state = GatewayState::new(pool, Arc::new(MemoryCache::new()), &config);
    create_router(state)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));

    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Register a user and log in, returning (user_id, token)
async fn register_and_login(router: &Router, username: &str, email: &str) -> (i64, String) {
    let (status, user) = send(
        router,
        json_request(
            "POST",
            "/users",
            json!({"username": username, "email": email, "password": "hunter42"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, login) = send(
        router,
        json_request(
            "POST",
            "/login",
            json!({"username": username, "password": "hunter42"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        user["id"].as_i64().unwrap(),
        login["access_token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn register_login_me_flow() {
    let router = test_router().await;
    let (user_id, token) = register_and_login(&router, "alice", "alice@example.com").await;

    let (status, me) = send(&router, authed_request("GET", "/users/me", &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"].as_i64().unwrap(), user_id);
    assert_eq!(me["username"], "alice");
    // Credentials never leak into responses.
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn login_response_carries_token_metadata() {
    let router = test_router().await;
    register_and_login(&router, "alice", "alice@example.com").await;

    let (status, login) = send(
        &router,
        json_request(
            "POST",
            "/login",
            json!({"username": "alice", "password": "hunter42"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token_type"], "bearer");
    // 30-minute default lifetime.
    assert_eq!(login["expires_in"].as_i64().unwrap(), 30 * 60);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let router = test_router().await;
    register_and_login(&router, "alice", "alice@example.com").await;

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/login",
            json!({"username": "alice", "password": "wrong"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let router = test_router().await;
    register_and_login(&router, "alice", "alice@example.com").await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/users",
            json!({"username": "alice", "email": "new@example.com", "password": "hunter42"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("Username"));
}

#[tokio::test]
async fn protected_routes_reject_missing_and_malformed_headers() {
    let router = test_router().await;

    let (status, _) = send(
        &router,
        Request::builder()
            .uri("/users/me")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        Request::builder()
            .uri("/users/me")
            .header(header::AUTHORIZATION, "Basic abc123")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        authed_request("GET", "/users/me", "not.a.token", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cross_user_access_is_forbidden() {
    let router = test_router().await;
    let (alice_id, _) = register_and_login(&router, "alice", "alice@example.com").await;
    let (_, bob_token) = register_and_login(&router, "bob", "bob@example.com").await;

    let uri = format!("/users/{alice_id}/preferences");
    let (status, _) = send(&router, authed_request("GET", &uri, &bob_token, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &router,
        authed_request(
            "PUT",
            &format!("/users/{alice_id}"),
            &bob_token,
            Some(json!({"email": "stolen@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn preference_crud_flow() {
    let router = test_router().await;
    let (user_id, token) = register_and_login(&router, "alice", "alice@example.com").await;
    let base = format!("/users/{user_id}/preferences");

    // Create.
    let (status, created) = send(
        &router,
        authed_request(
            "POST",
            &base,
            &token,
            Some(json!({"notification_type": "email", "channel": "marketing"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["enabled"], true);
    let pref_id = created["id"].as_i64().unwrap();

    // List reflects the write immediately.
    let (status, listed) = send(&router, authed_request("GET", &base, &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Read a single record.
    let single_uri = format!("{base}/{pref_id}");
    let (status, single) = send(&router, authed_request("GET", &single_uri, &token, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["id"].as_i64().unwrap(), pref_id);

    // Update, then the next list must reflect it.
    let (status, updated) = send(
        &router,
        authed_request("PUT", &single_uri, &token, Some(json!({"enabled": false}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["enabled"], false);

    let (_, listed) = send(&router, authed_request("GET", &base, &token, None)).await;
    assert_eq!(listed[0]["enabled"], false);

    // Delete, then the list is empty.
    let (status, _) = send(
        &router,
        authed_request("DELETE", &single_uri, &token, None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&router, authed_request("GET", &base, &token, None)).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_preference_conflicts() {
    let router = test_router().await;
    let (user_id, token) = register_and_login(&router, "alice", "alice@example.com").await;
    let base = format!("/users/{user_id}/preferences");
    let body = json!({"notification_type": "email", "channel": "marketing"});

    let (status, _) = send(
        &router,
        authed_request("POST", &base, &token, Some(body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&router, authed_request("POST", &base, &token, Some(body))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_preference_is_not_found() {
    let router = test_router().await;
    let (user_id, token) = register_and_login(&router, "alice", "alice@example.com").await;

    let uri = format!("/users/{user_id}/preferences/999");
    let (status, _) = send(
        &router,
        authed_request("PUT", &uri, &token, Some(json!({"enabled": false}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn internal_routes_skip_bearer_auth() {
    let router = test_router().await;
    let (user_id, token) = register_and_login(&router, "alice", "alice@example.com").await;

    send(
        &router,
        authed_request(
            "POST",
            &format!("/users/{user_id}/preferences"),
            &token,
            Some(json!({"notification_type": "email", "channel": "marketing"})),
        ),
    )
    .await;

    // No Authorization header on either internal endpoint.
    let (status, user) = send(
        &router,
        Request::builder()
            .uri(format!("/internal/users/{user_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "alice");

    let (status, prefs) = send(
        &router,
        Request::builder()
            .uri(format!("/internal/users/{user_id}/preferences"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn health_reports_dependency_status() {
    let router = test_router().await;

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["cache"], "connected");
}

#[tokio::test]
async fn update_user_changes_profile() {
    let router = test_router().await;
    let (user_id, token) = register_and_login(&router, "alice", "alice@example.com").await;

    let (status, updated) = send(
        &router,
        authed_request(
            "PUT",
            &format!("/users/{user_id}"),
            &token,
            Some(json!({"email": "alice@new.example.com"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "alice@new.example.com");

    let (_, me) = send(&router, authed_request("GET", "/users/me", &token, None)).await;
    assert_eq!(me["email"], "alice@new.example.com");
}
