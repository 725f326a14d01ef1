use crate::config::CacheConfig;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};

/// Cache operations handlers depend on.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn health_check(&self) -> Result<(), anyhow::Error>;
}

#[derive(Clone)]
pub struct RedisCache {
    _client: Client,
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect and verify the server answers `PING`.
    pub async fn connect(config: &CacheConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(addr = %config.addr(), "Connecting to Redis");
        let client = Client::open(config.url())?;

        // ConnectionManager reconnects automatically after the first connect.
        let manager = client.get_connection_manager().await.map_err(|e| {
            tracing::error!("Failed to get Redis connection manager: {}", e);
            anyhow::anyhow!("Failed to connect to Redis: {}", e)
        })?;

        let cache = Self {
            _client: client,
            manager,
        };
        cache
            .health_check()
            .await
            .map_err(|e| anyhow::anyhow!("could not ping redis: {}", e))?;

        tracing::info!("Successfully connected to Redis");
        Ok(cache)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn health_check(&self) -> Result<(), anyhow::Error> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("Redis health check failed: {}", e))?;
        Ok(())
    }
}
