use std::sync::Arc;

use anyhow::Context;
use courier_cache::{CacheStore, MemoryCache, RedisCache};
use courier_config::{load as load_config, AppConfig};
use courier_gateway::{create_router, GatewayState};
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("starting Courier backend");

    let config = load_config().context("failed to load configuration")?;

    let pool = courier_database::initialize_database(&config.database)
        .await
        .context("failed to initialize database")?;

    let cache = connect_cache(&config).await;

    let state = GatewayState::new(pool, cache, &config);
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

/// Connect the configured cache backend.
///
/// Redis being down at startup is not fatal: reads degrade to the store, so
/// the service comes up with an in-process cache and logs the downgrade.
async fn connect_cache(config: &AppConfig) -> Arc<dyn CacheStore> {
    if !config.cache.enabled {
        info!("cache disabled by configuration, using in-process cache");
        return Arc::new(MemoryCache::new());
    }

    let url = config.cache.redis_url();
    match RedisCache::connect(&url).await {
        Ok(cache) => {
            info!(%url, "redis cache connected");
            Arc::new(cache)
        }
        Err(err) => {
            warn!(%url, error = %err, "failed to connect to redis, using in-process cache");
            Arc::new(MemoryCache::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
