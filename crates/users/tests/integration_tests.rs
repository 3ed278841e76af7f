//! Integration tests for the domain services with a real database

use std::sync::Arc;
use std::time::Duration;

use courier_cache::{keys, CacheStore, MemoryCache};
use courier_database::{
    run_migrations, CreatePreferenceRequest, CreateUserRequest, PreferenceError,
    UpdatePreferenceRequest,
};
use courier_users::{PreferenceService, UserService};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

const TTL: Duration = Duration::from_secs(3600);

// Pooled in-memory SQLite gives every connection its own database, so the
// test pool is pinned to a single connection.
async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite://:memory:")
        .await
        .expect("Failed to create test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

fn register_request(username: &str, email: &str) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: "hunter42".to_string(),
    }
}

fn preference_request(notification_type: &str, channel: &str) -> CreatePreferenceRequest {
    CreatePreferenceRequest {
        notification_type: notification_type.to_string(),
        channel: channel.to_string(),
        enabled: true,
    }
}

#[tokio::test]
async fn preference_flow_against_real_store() {
    let pool = create_test_pool().await;
    let cache = Arc::new(MemoryCache::new());
    let users = UserService::new(pool.clone());
    let preferences = PreferenceService::new(pool, cache.clone(), TTL);

    let alice = users
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    // Round-trip: create then read back exactly that record.
    let created = preferences
        .create_preference(alice.id, preference_request("email", "marketing"))
        .await
        .unwrap();
    let listed = preferences.get_preferences(alice.id).await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    // The read populated the cache; a write through the coordinator clears it.
    assert!(cache
        .get(&keys::user_preferences(alice.id))
        .await
        .unwrap()
        .is_some());

    preferences
        .update_preference(
            alice.id,
            created.id,
            UpdatePreferenceRequest {
                enabled: Some(false),
            },
        )
        .await
        .unwrap();

    assert!(cache
        .get(&keys::user_preferences(alice.id))
        .await
        .unwrap()
        .is_none());

    let after_update = preferences.get_preferences(alice.id).await.unwrap();
    assert_eq!(after_update.len(), 1);
    assert!(!after_update[0].enabled);
}

#[tokio::test]
async fn duplicate_preference_is_a_conflict_at_the_store_level() {
    let pool = create_test_pool().await;
    let users = UserService::new(pool.clone());
    let preferences = PreferenceService::new(pool, Arc::new(MemoryCache::new()), TTL);

    let alice = users
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    preferences
        .create_preference(alice.id, preference_request("email", "marketing"))
        .await
        .unwrap();
    let err = preferences
        .create_preference(alice.id, preference_request("email", "marketing"))
        .await
        .unwrap_err();

    assert!(matches!(err, PreferenceError::Conflict));
    assert_eq!(preferences.get_preferences(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn login_flow_against_real_store() {
    let pool = create_test_pool().await;
    let users = UserService::new(pool);

    let registered = users
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();

    let authenticated = users.authenticate("alice", "hunter42").await.unwrap();
    assert_eq!(authenticated.id, registered.id);

    assert!(users.authenticate("alice", "wrong").await.is_err());
}

#[tokio::test]
async fn preferences_of_two_users_do_not_mix() {
    let pool = create_test_pool().await;
    let cache = Arc::new(MemoryCache::new());
    let users = UserService::new(pool.clone());
    let preferences = PreferenceService::new(pool, cache, TTL);

    let alice = users
        .register(register_request("alice", "alice@example.com"))
        .await
        .unwrap();
    let bob = users
        .register(register_request("bob", "bob@example.com"))
        .await
        .unwrap();

    preferences
        .create_preference(alice.id, preference_request("email", "marketing"))
        .await
        .unwrap();
    preferences
        .create_preference(bob.id, preference_request("push", "transactional"))
        .await
        .unwrap();

    let alice_prefs = preferences.get_preferences(alice.id).await.unwrap();
    let bob_prefs = preferences.get_preferences(bob.id).await.unwrap();

    assert_eq!(alice_prefs.len(), 1);
    assert_eq!(alice_prefs[0].notification_type, "email");
    assert_eq!(bob_prefs.len(), 1);
    assert_eq!(bob_prefs[0].notification_type, "push");
}
