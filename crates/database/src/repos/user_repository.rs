//! User repository for database operations.

use crate::entities::{NewUser, UpdateUserRequest, User};
use crate::types::{UserError, UserResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, is_active, created_at, updated_at
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, is_active, created_at, updated_at
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, is_active, created_at, updated_at
             FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(map_user))
    }

    /// Insert a new user row
    pub async fn create(&self, new_user: &NewUser) -> UserResult<User> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, is_active, created_at)
             VALUES (?, ?, ?, 1, ?)",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();
        self.find_by_id(user_id).await?.ok_or_else(|| {
            UserError::DatabaseError("Failed to retrieve created user".to_string())
        })
    }

    /// Apply a partial update to a user row
    pub async fn update(&self, user_id: i64, request: &UpdateUserRequest) -> UserResult<User> {
        if request.is_empty() {
            return self
                .find_by_id(user_id)
                .await?
                .ok_or(UserError::UserNotFound);
        }

        let mut set_clauses = Vec::new();
        if request.username.is_some() {
            set_clauses.push("username = ?");
        }
        if request.email.is_some() {
            set_clauses.push("email = ?");
        }
        if request.is_active.is_some() {
            set_clauses.push("is_active = ?");
        }
        set_clauses.push("updated_at = ?");

        let sql = format!("UPDATE users SET {} WHERE id = ?", set_clauses.join(", "));
        let mut query = sqlx::query(&sql);

        if let Some(ref username) = request.username {
            query = query.bind(username);
        }
        if let Some(ref email) = request.email {
            query = query.bind(email);
        }
        if let Some(is_active) = request.is_active {
            query = query.bind(is_active);
        }

        let result = query
            .bind(Utc::now().to_rfc3339())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::UserNotFound);
        }

        self.find_by_id(user_id).await?.ok_or(UserError::UserNotFound)
    }
}

fn map_user(row: sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
