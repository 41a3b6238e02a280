use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

use super::DbClient;
use crate::errors::ApiError;
use crate::Result;

/// Whether `err` means the stored connection is no longer usable
fn connection_lost(err: &redis::RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal()
}

impl DbClient {
    async fn on_command_error(&self, err: &redis::RedisError) {
        if connection_lost(err) {
            self.reset_async_redis_conn().await;
        }
    }

    pub async fn set_cache(&self, key: &str, value: &str) -> Result<()> {
        let mut redis_conn = self.get_async_redis_conn().await.map_err(|err| {
            tracing::error!("Redis connection error: {}", err);
            ApiError::from(err)
        })?;
        if let Err(err) = redis_conn
            .set_ex::<_, _, ()>(key, value, self.cache_ttl_seconds)
            .await
        {
            tracing::error!("Redis SET failed: {}", err);
            self.on_command_error(&err).await;
            return Err(err.into());
        }
        tracing::debug!("Cache set for key: {}", key);
        Ok(())
    }

    pub async fn get_cache(&self, key: &str) -> Result<String> {
        let mut redis_conn = self.get_async_redis_conn().await.map_err(|err| {
            tracing::error!("Redis connection error: {}", err);
            ApiError::from(err)
        })?;

        let value: Option<String> = match redis_conn.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("Redis GET failed: {}", err);
                self.on_command_error(&err).await;
                return Err(err.into());
            }
        };

        value.ok_or_else(|| ApiError::NotFound(format!("cache entry {key}")))
    }

    /// Reads a JSON value from the cache. Any cache failure counts as a miss.
    pub(crate) async fn get_cached_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_cache(key).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Discarding undecodable cache entry {}: {}", key, err);
                None
            }
        }
    }

    /// Stores a JSON value in the cache, logging instead of failing
    pub(crate) async fn put_cached_json<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!("Failed to encode cache entry {}: {}", key, err);
                return;
            }
        };
        if let Err(err) = self.set_cache(key, &raw).await {
            tracing::warn!("Failed to cache {}: {}", key, err);
        }
    }
}
