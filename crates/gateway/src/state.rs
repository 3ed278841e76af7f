//! Shared application state for the gateway

use std::sync::Arc;
use std::time::Duration;

use courier_auth::TokenService;
use courier_cache::CacheStore;
use courier_config::AppConfig;
use courier_database::{PreferenceRepository, UserRepository};
use courier_users::{PreferenceService, UserService};
use sqlx::SqlitePool;

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool, kept for health probes
    pub pool: SqlitePool,
    /// Cache handle, kept for health probes
    pub cache: Arc<dyn CacheStore>,
    /// Token service
    pub token_service: Arc<TokenService>,
    /// User service
    pub user_service: Arc<UserService<UserRepository>>,
    /// Preference cache coordinator
    pub preference_service: Arc<PreferenceService<PreferenceRepository>>,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool, cache: Arc<dyn CacheStore>, config: &AppConfig) -> Self {
        let cache_ttl = Duration::from_secs(config.cache.ttl_minutes * 60);

        let token_service = Arc::new(TokenService::new(&config.auth));
        let user_service = Arc::new(UserService::new(pool.clone()));
        let preference_service = Arc::new(PreferenceService::new(
            pool.clone(),
            cache.clone(),
            cache_ttl,
        ));

        Self {
            pool,
            cache,
            token_service,
            user_service,
            preference_service,
        }
    }

    /// Get a token service reference
    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }

    /// Get a user service reference
    pub fn user_service(&self) -> &UserService<UserRepository> {
        &self.user_service
    }

    /// Get a preference service reference
    pub fn preference_service(&self) -> &PreferenceService<PreferenceRepository> {
        &self.preference_service
    }
}
