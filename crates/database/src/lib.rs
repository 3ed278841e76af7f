//! Courier Database Crate
//!
//! This crate provides durable-store functionality for the Courier backend,
//! including connection management, migrations, and the user and
//! notification-preference repositories. It is the source of truth the cache
//! layer is kept coherent against.

use courier_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{ping, prepare_database};
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{PreferenceRepository, UserRepository};

// Re-export entities
pub use entities::{
    preference::{CreatePreferenceRequest, NotificationPreference, UpdatePreferenceRequest},
    user::{CreateUserRequest, NewUser, UpdateUserRequest, User},
};

// Re-export types
pub use types::{
    errors::{PreferenceError, UserError},
    PreferenceResult, UserResult,
};

/// Connect to the store and bring the schema up to date
pub async fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let pool = prepare_database(config).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
