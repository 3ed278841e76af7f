//! Preference service: cache-aside coordination between the durable store
//! and the key-value cache.
//!
//! Reads are cache-first; a miss reads the store and fills the cache. Writes
//! persist to the store and then *delete* the user's cached snapshot rather
//! than rewriting it, so a concurrent writer can never be overwritten by a
//! stale refresh. The delete is awaited before success is returned, which
//! gives callers read-own-write consistency. Cache failures are absorbed:
//! reads fall through to the store and writes tolerate a failed invalidation
//! (the entry then ages out by TTL).
//!
//! No lock is held across any store or cache await; concurrent misses for
//! the same user may each read the store, and their cache fills converge
//! because both saw the same committed state.

use std::sync::Arc;
use std::time::Duration;

use courier_cache::{keys, CacheStore};
use courier_database::{
    CreatePreferenceRequest, NotificationPreference, PreferenceError, PreferenceRepository,
    PreferenceResult, UpdatePreferenceRequest,
};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::mock_repositories::MockPreferenceRepository;

/// Coordinates preference reads and writes across store and cache
pub struct PreferenceService<R> {
    repo: R,
    cache: Arc<dyn CacheStore>,
    cache_ttl: Duration,
}

impl PreferenceService<PreferenceRepository> {
    /// Create a preference service backed by the real database repository
    pub fn new(pool: SqlitePool, cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            repo: PreferenceRepository::new(pool),
            cache,
            cache_ttl,
        }
    }
}

impl PreferenceService<MockPreferenceRepository> {
    /// Create a preference service over in-memory repositories for testing
    pub fn new_for_testing(cache: Arc<dyn CacheStore>, cache_ttl: Duration) -> Self {
        Self {
            repo: MockPreferenceRepository::new(),
            cache,
            cache_ttl,
        }
    }
}

impl<R> PreferenceService<R>
where
    R: PreferenceRepo,
{
    /// All preferences for a user, cache-first.
    pub async fn get_preferences(
        &self,
        user_id: i64,
    ) -> PreferenceResult<Vec<NotificationPreference>> {
        let key = keys::user_preferences(user_id);

        match self.cache.get(&key).await {
            Ok(Some(snapshot)) => match serde_json::from_str(&snapshot) {
                Ok(preferences) => return Ok(preferences),
                Err(error) => {
                    warn!(user_id, %error, "corrupt preference snapshot in cache, rereading store");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(user_id, %error, "cache read failed, falling back to store");
            }
        }

        let preferences = self.repo.list_for_user(user_id).await?;

        match serde_json::to_string(&preferences) {
            Ok(snapshot) => {
                if let Err(error) = self.cache.set(&key, &snapshot, self.cache_ttl).await {
                    warn!(user_id, %error, "failed to populate preference cache");
                }
            }
            Err(error) => {
                warn!(user_id, %error, "failed to serialize preference snapshot");
            }
        }

        Ok(preferences)
    }

    /// A single preference owned by the user
    pub async fn get_preference(
        &self,
        user_id: i64,
        preference_id: i64,
    ) -> PreferenceResult<NotificationPreference> {
        self.repo
            .find(user_id, preference_id)
            .await?
            .ok_or(PreferenceError::NotFound)
    }

    /// Create a preference and invalidate the user's cached snapshot.
    ///
    /// A duplicate (type, channel) tuple fails with `Conflict` before the
    /// cache is touched.
    pub async fn create_preference(
        &self,
        user_id: i64,
        request: CreatePreferenceRequest,
    ) -> PreferenceResult<NotificationPreference> {
        request
            .validate()
            .map_err(PreferenceError::InvalidPreferenceData)?;

        let created = self.repo.insert(user_id, &request).await?;

        info!(
            user_id,
            preference_id = created.id,
            notification_type = %created.notification_type,
            channel = %created.channel,
            "created notification preference"
        );

        self.invalidate(user_id).await;
        Ok(created)
    }

    /// Update a preference and invalidate the user's cached snapshot
    pub async fn update_preference(
        &self,
        user_id: i64,
        preference_id: i64,
        request: UpdatePreferenceRequest,
    ) -> PreferenceResult<NotificationPreference> {
        let Some(enabled) = request.enabled else {
            // Nothing to change; no write, no invalidation.
            return self.get_preference(user_id, preference_id).await;
        };

        let updated = self
            .repo
            .update_enabled(user_id, preference_id, enabled)
            .await?
            .ok_or(PreferenceError::NotFound)?;

        info!(user_id, preference_id, enabled, "updated notification preference");

        self.invalidate(user_id).await;
        Ok(updated)
    }

    /// Delete a preference and invalidate the user's cached snapshot
    pub async fn delete_preference(
        &self,
        user_id: i64,
        preference_id: i64,
    ) -> PreferenceResult<()> {
        if !self.repo.delete(user_id, preference_id).await? {
            return Err(PreferenceError::NotFound);
        }

        info!(user_id, preference_id, "deleted notification preference");

        self.invalidate(user_id).await;
        Ok(())
    }

    /// Delete the cached snapshot for a user.
    ///
    /// Awaited before the surrounding write returns, so a successful write is
    /// never followed by a read of the pre-write snapshot. If the delete
    /// fails the entry is stale at most until its TTL; the write itself has
    /// already committed and must not be failed retroactively.
    async fn invalidate(&self, user_id: i64) {
        let key = keys::user_preferences(user_id);
        if let Err(error) = self.cache.delete(&key).await {
            warn!(user_id, %error, "cache invalidation failed, entry will age out by TTL");
        }
    }
}

/// Trait for preference repositories to allow generic usage
pub trait PreferenceRepo {
    async fn list_for_user(&self, user_id: i64) -> PreferenceResult<Vec<NotificationPreference>>;
    async fn find(
        &self,
        user_id: i64,
        preference_id: i64,
    ) -> PreferenceResult<Option<NotificationPreference>>;
    async fn insert(
        &self,
        user_id: i64,
        request: &CreatePreferenceRequest,
    ) -> PreferenceResult<NotificationPreference>;
    async fn update_enabled(
        &self,
        user_id: i64,
        preference_id: i64,
        enabled: bool,
    ) -> PreferenceResult<Option<NotificationPreference>>;
    async fn delete(&self, user_id: i64, preference_id: i64) -> PreferenceResult<bool>;
}

impl PreferenceRepo for PreferenceRepository {
    async fn list_for_user(&self, user_id: i64) -> PreferenceResult<Vec<NotificationPreference>> {
        self.list_for_user(user_id).await
    }

    async fn find(
        &self,
        user_id: i64,
        preference_id: i64,
    ) -> PreferenceResult<Option<NotificationPreference>> {
        self.find(user_id, preference_id).await
    }

    async fn insert(
        &self,
        user_id: i64,
        request: &CreatePreferenceRequest,
    ) -> PreferenceResult<NotificationPreference> {
        self.insert(user_id, request).await
    }

    async fn update_enabled(
        &self,
        user_id: i64,
        preference_id: i64,
        enabled: bool,
    ) -> PreferenceResult<Option<NotificationPreference>> {
        self.update_enabled(user_id, preference_id, enabled).await
    }

    async fn delete(&self, user_id: i64, preference_id: i64) -> PreferenceResult<bool> {
        self.delete(user_id, preference_id).await
    }
}
