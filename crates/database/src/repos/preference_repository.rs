//! Notification preference repository for database operations.
//!
//! Every query is scoped by `user_id` so a preference can never be read or
//! written through another user's id, regardless of what the caller passes.

use crate::entities::{CreatePreferenceRequest, NotificationPreference};
use crate::types::PreferenceResult;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Repository for notification preference database operations
#[derive(Clone)]
pub struct PreferenceRepository {
    pool: SqlitePool,
}

impl PreferenceRepository {
    /// Create a new preference repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all preferences for a user, ordered by id
    pub async fn list_for_user(
        &self,
        user_id: i64,
    ) -> PreferenceResult<Vec<NotificationPreference>> {
        let rows = sqlx::query(
            "SELECT id, user_id, notification_type, channel, enabled, created_at, updated_at
             FROM notification_preferences WHERE user_id = ? ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(map_preference).collect())
    }

    /// Find a single preference owned by the given user
    pub async fn find(
        &self,
        user_id: i64,
        preference_id: i64,
    ) -> PreferenceResult<Option<NotificationPreference>> {
        let row = sqlx::query(
            "SELECT id, user_id, notification_type, channel, enabled, created_at, updated_at
             FROM notification_preferences WHERE id = ? AND user_id = ?",
        )
        .bind(preference_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_preference))
    }

    /// Insert a new preference row.
    ///
    /// The unique index on (user_id, notification_type, channel) surfaces a
    /// duplicate tuple as `PreferenceError::Conflict`.
    pub async fn insert(
        &self,
        user_id: i64,
        request: &CreatePreferenceRequest,
    ) -> PreferenceResult<NotificationPreference> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO notification_preferences
                 (user_id, notification_type, channel, enabled, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&request.notification_type)
        .bind(&request.channel)
        .bind(request.enabled)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let preference_id = result.last_insert_rowid();
        self.find(user_id, preference_id).await?.ok_or_else(|| {
            crate::types::PreferenceError::DatabaseError(
                "Failed to retrieve created preference".to_string(),
            )
        })
    }

    /// Flip the enabled flag on a preference owned by the given user.
    ///
    /// Returns `None` when the row does not exist or belongs to someone else.
    pub async fn update_enabled(
        &self,
        user_id: i64,
        preference_id: i64,
        enabled: bool,
    ) -> PreferenceResult<Option<NotificationPreference>> {
        let result = sqlx::query(
            "UPDATE notification_preferences SET enabled = ?, updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(enabled)
        .bind(Utc::now().to_rfc3339())
        .bind(preference_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find(user_id, preference_id).await
    }

    /// Delete a preference owned by the given user; returns whether a row was removed
    pub async fn delete(&self, user_id: i64, preference_id: i64) -> PreferenceResult<bool> {
        let result = sqlx::query(
            "DELETE FROM notification_preferences WHERE id = ? AND user_id = ?",
        )
        .bind(preference_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_preference(row: sqlx::sqlite::SqliteRow) -> NotificationPreference {
    NotificationPreference {
        id: row.get("id"),
        user_id: row.get("user_id"),
        notification_type: row.get("notification_type"),
        channel: row.get("channel"),
        enabled: row.get("enabled"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
