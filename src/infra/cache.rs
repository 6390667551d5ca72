//! Redis adapter behind the `CacheStore` seam. Values are stored as JSON
//! text; entries written by other clients that are not valid JSON come back
//! as plain strings.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde_json::Value;

use crate::application::cache::{CacheError, CacheStore};

#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connects and verifies the server is reachable. The connection manager
    /// reconnects on its own afterwards.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(map_redis_error)?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(map_redis_error)?;
        let cache = Self { manager };
        cache.ping().await?;
        Ok(cache)
    }
}

fn map_redis_error(err: redis::RedisError) -> CacheError {
    CacheError::unavailable(err.to_string())
}

fn decode(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get_value(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(raw.map(decode))
    }

    async fn set_value(
        &self,
        key: &str,
        value: &Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let payload =
            serde_json::to_string(value).map_err(|err| CacheError::unavailable(err.to_string()))?;
        let mut conn = self.manager.clone();
        match ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key, payload, ttl.as_secs())
                    .await
                    .map_err(map_redis_error)?;
            }
            None => {
                let _: () = conn.set(key, payload).await.map_err(map_redis_error)?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.manager.clone();
        let removed: i64 = conn.del(key).await.map_err(map_redis_error)?;
        Ok(removed > 0)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.manager.clone();
        conn.keys(pattern).await.map_err(map_redis_error)
    }

    async fn ttl(&self, key: &str) -> Result<i64, CacheError> {
        let mut conn = self.manager.clone();
        conn.ttl(key).await.map_err(map_redis_error)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}
