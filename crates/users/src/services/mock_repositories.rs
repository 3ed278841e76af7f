//! Mock repository and cache implementations for testing core service
//! functionality without a database or Redis.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use courier_cache::{CacheError, CacheResult, CacheStore};
use courier_database::{
    CreatePreferenceRequest, NewUser, NotificationPreference, PreferenceError, PreferenceResult,
    UpdateUserRequest, User, UserResult,
};
use tokio::sync::RwLock;

use super::preference_service::PreferenceRepo;
use super::user_service::UserRepo;

/// Mock user repository for testing
#[derive(Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<i64, User>>>,
    next_id: Arc<RwLock<i64>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
        }
    }
}

impl UserRepo for MockUserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        let mut next_id = self.next_id.write().await;
        let user_id = *next_id;
        *next_id += 1;

        let user = User {
            id: user_id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
            updated_at: None,
        };

        let mut users = self.users.write().await;
        users.insert(user_id, user.clone());

        Ok(user)
    }

    async fn update(&self, user_id: i64, request: &UpdateUserRequest) -> UserResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or(courier_database::UserError::UserNotFound)?;

        if let Some(ref username) = request.username {
            user.username = username.clone();
        }
        if let Some(ref email) = request.email {
            user.email = email.clone();
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Some(chrono::Utc::now().to_rfc3339());

        Ok(user.clone())
    }
}

/// Mock preference repository for testing.
///
/// Counts `list_for_user` calls so tests can assert that a cache hit really
/// skipped the store.
#[derive(Default)]
pub struct MockPreferenceRepository {
    preferences: Arc<RwLock<HashMap<i64, NotificationPreference>>>,
    next_id: Arc<RwLock<i64>>,
    list_calls: Arc<AtomicUsize>,
}

impl MockPreferenceRepository {
    pub fn new() -> Self {
        Self {
            preferences: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(RwLock::new(1)),
            list_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `list_for_user` calls observed so far
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl PreferenceRepo for MockPreferenceRepository {
    async fn list_for_user(&self, user_id: i64) -> PreferenceResult<Vec<NotificationPreference>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let preferences = self.preferences.read().await;
        let mut owned: Vec<NotificationPreference> = preferences
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|p| p.id);
        Ok(owned)
    }

    async fn find(
        &self,
        user_id: i64,
        preference_id: i64,
    ) -> PreferenceResult<Option<NotificationPreference>> {
        let preferences = self.preferences.read().await;
        Ok(preferences
            .get(&preference_id)
            .filter(|p| p.user_id == user_id)
            .cloned())
    }

    async fn insert(
        &self,
        user_id: i64,
        request: &CreatePreferenceRequest,
    ) -> PreferenceResult<NotificationPreference> {
        let mut preferences = self.preferences.write().await;

        let duplicate = preferences.values().any(|p| {
            p.user_id == user_id
                && p.notification_type == request.notification_type
                && p.channel == request.channel
        });
        if duplicate {
            return Err(PreferenceError::Conflict);
        }

        let mut next_id = self.next_id.write().await;
        let preference_id = *next_id;
        *next_id += 1;

        let preference = NotificationPreference {
            id: preference_id,
            user_id,
            notification_type: request.notification_type.clone(),
            channel: request.channel.clone(),
            enabled: request.enabled,
            created_at: chrono::Utc::now().to_rfc3339(),
            updated_at: None,
        };

        preferences.insert(preference_id, preference.clone());
        Ok(preference)
    }

    async fn update_enabled(
        &self,
        user_id: i64,
        preference_id: i64,
        enabled: bool,
    ) -> PreferenceResult<Option<NotificationPreference>> {
        let mut preferences = self.preferences.write().await;
        match preferences
            .get_mut(&preference_id)
            .filter(|p| p.user_id == user_id)
        {
            Some(preference) => {
                preference.enabled = enabled;
                preference.updated_at = Some(chrono::Utc::now().to_rfc3339());
                Ok(Some(preference.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, user_id: i64, preference_id: i64) -> PreferenceResult<bool> {
        let mut preferences = self.preferences.write().await;
        let owned = preferences
            .get(&preference_id)
            .map(|p| p.user_id == user_id)
            .unwrap_or(false);

        if owned {
            preferences.remove(&preference_id);
        }
        Ok(owned)
    }
}

/// Cache double whose every operation fails, for degraded-mode tests.
pub struct FailingCache;

#[async_trait]
impl CacheStore for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable("forced failure".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Unavailable("forced failure".to_string()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<bool> {
        Err(CacheError::Unavailable("forced failure".to_string()))
    }

    async fn ping(&self) -> CacheResult<()> {
        Err(CacheError::Unavailable("forced failure".to_string()))
    }
}
