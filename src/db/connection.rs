use diesel_async::pooled_connection::deadpool::{self, PoolError};
use diesel_async::pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager};
use diesel_async::AsyncPgConnection;
use redis::aio::MultiplexedConnection;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::errors::ApiError;
use crate::Result;

const DEFAULT_POOL_SIZE: usize = 20;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 60;

#[derive(Clone)]
pub struct DbClient {
    pub db_pool: Pool<AsyncPgConnection>,
    pub async_redis_conn: Arc<Mutex<Option<MultiplexedConnection>>>,
    redis_url: String,
    pub(crate) cache_ttl_seconds: u64,
}

impl DbClient {
    pub fn new(db_url: &str, redis_url: &str) -> Result<Self> {
        Self::with_config(db_url, redis_url, DEFAULT_POOL_SIZE, DEFAULT_CACHE_TTL_SECONDS)
    }

    pub fn with_config(
        db_url: &str,
        redis_url: &str,
        pool_size: usize,
        cache_ttl_seconds: u64,
    ) -> Result<Self> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
        let postgres_pool = Pool::builder(config)
            .max_size(pool_size)
            .build()
            .map_err(|e| ApiError::Custom(format!("Failed to create DB Pool: {e}")))?;

        Ok(Self {
            db_pool: postgres_pool,
            async_redis_conn: Arc::new(Mutex::new(None)),
            redis_url: redis_url.to_string(),
            cache_ttl_seconds,
        })
    }

    /// Get a connection from the Postgres pool
    pub async fn get_db_conn(
        &self,
    ) -> std::result::Result<deadpool::Object<AsyncPgConnection>, PoolError> {
        self.db_pool.get().await
    }

    /// Get async Redis connection (creates one if it doesn't exist)
    ///
    /// The lock is not held while connecting.
    pub async fn get_async_redis_conn(
        &self,
    ) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        if let Some(conn) = self.async_redis_conn.lock().await.as_ref() {
            return Ok(conn.clone());
        }

        let client = redis::Client::open(self.redis_url.as_str())?;
        let multiplexed_conn = client.get_multiplexed_async_connection().await?;

        // Another task may have connected in the meantime
        let mut conn_guard = self.async_redis_conn.lock().await;
        Ok(conn_guard.get_or_insert(multiplexed_conn).clone())
    }

    /// Drops the stored Redis connection so the next access reconnects
    pub(crate) async fn reset_async_redis_conn(&self) {
        if self.async_redis_conn.lock().await.take().is_some() {
            tracing::warn!("Dropped Redis connection, reconnecting on next access");
        }
    }
}
