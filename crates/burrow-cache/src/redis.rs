use async_trait::async_trait;
use burrow_core::{CacheError, KvCache};
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

use crate::Result;

/// A Redis-based implementation of [`KvCache`].
///
/// Values are stored as plain strings under a configurable key prefix.
/// The atomic-increment primitive maps to `INCRBY`, seeded with `SET NX`
/// when the requested initial value differs from the step.
#[derive(Debug, Clone)]
pub struct RedisKvCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisKvCache {
    /// Creates a new Redis cache from a multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "burrow:".to_string(),
        }
    }

    /// Creates a new Redis cache with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    fn cache_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KvCache for RedisKvCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let redis_key = self.cache_key(key);
        trace!(key, "fetching value from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&redis_key).await {
            Ok(Some(value)) => {
                debug!(key, "cache hit in Redis");
                Ok(Some(value))
            }
            Ok(None) => {
                trace!(key, "cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let redis_key = self.cache_key(key);
        trace!(key, "storing value in Redis cache");

        let mut conn = self.conn.clone();
        match conn.set::<_, _, ()>(&redis_key, value).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(key, error = %e, "failed to store value in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }

    async fn incr(&self, key: &str, by: i64, initial: i64) -> Result<i64> {
        let redis_key = self.cache_key(key);
        let mut conn = self.conn.clone();

        if initial != by {
            // Seed the key so the first increment observes `initial`
            // rather than `by`. SET NX keeps concurrent seeders safe.
            conn.set_nx::<_, _, bool>(&redis_key, initial - by)
                .await
                .map_err(|e| map_redis_error("failed to seed counter in Redis", e))?;
        }

        match conn.incr::<_, _, i64>(&redis_key, by).await {
            Ok(value) => {
                trace!(key, value, "incremented counter in Redis");
                Ok(value)
            }
            Err(e) => {
                warn!(key, error = %e, "failed to increment counter in Redis");
                Err(map_redis_error("failed to increment counter in Redis", e))
            }
        }
    }
}
