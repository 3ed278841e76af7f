//! Database migrations

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::info;

// Include migrations from the migrations directory
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("database migrations failed")?;
    info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::Row;

    // Pooled in-memory SQLite gives every connection its own database, so
    // tests pin the pool to a single connection.
    async fn in_memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite://:memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn migrations_create_expected_tables() {
        let pool = in_memory_pool().await;
        run_migrations(&pool).await.unwrap();

        let tables = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<String> = tables.iter().map(|row| row.get("name")).collect();
        assert!(names.contains(&"users".to_string()));
        assert!(names.contains(&"notification_preferences".to_string()));
    }

    #[tokio::test]
    async fn preference_tuple_is_unique() {
        let pool = in_memory_pool().await;
        run_migrations(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at)
             VALUES ('alice', 'alice@example.com', 'hash', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let insert = "INSERT INTO notification_preferences
                          (user_id, notification_type, channel, enabled, created_at)
                      VALUES (1, 'email', 'marketing', 1, '2024-01-01T00:00:00Z')";

        sqlx::query(insert).execute(&pool).await.unwrap();
        let duplicate = sqlx::query(insert).execute(&pool).await;
        assert!(duplicate.is_err());
    }
}
