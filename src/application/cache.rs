//! Cache layer over a key/value store. Listing reads go through the cache on
//! a best-effort basis: any store failure degrades to the database and is
//! surfaced only as a warning plus a metric. The explicit `/api/cache` and
//! `/api/redis` surfaces are strict instead and propagate store failures.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use rubrica_api_types::{CacheEntry, User};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Reserved key for the cached user listing.
pub const USER_LIST_KEY: &str = "users:all";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

impl CacheError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Key/value store seam implemented by the Redis adapter and by test stubs.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_value(&self, key: &str) -> Result<Option<Value>, CacheError>;

    async fn set_value(
        &self,
        key: &str,
        value: &Value,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// Returns true when the key existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Remaining lifetime in seconds; -1 for no expiry, -2 for a missing key.
    async fn ttl(&self, key: &str) -> Result<i64, CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;

    async fn flush(&self) -> Result<(), CacheError>;
}

#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn CacheStore>,
    default_ttl: Duration,
    user_list_ttl: Duration,
}

impl CacheService {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: Duration, user_list_ttl: Duration) -> Self {
        Self {
            store,
            default_ttl,
            user_list_ttl,
        }
    }

    /// Cached user listing, or None on miss, parse failure or store failure.
    pub async fn read_user_list(&self) -> Option<Vec<User>> {
        match self.store.get_value(USER_LIST_KEY).await {
            Ok(Some(value)) => match serde_json::from_value::<Vec<User>>(value) {
                Ok(users) => {
                    counter!("rubrica_cache_hit_total").increment(1);
                    Some(users)
                }
                Err(err) => {
                    counter!("rubrica_cache_error_total").increment(1);
                    warn!(error = %err, key = USER_LIST_KEY, "discarding unreadable cache entry");
                    None
                }
            },
            Ok(None) => {
                counter!("rubrica_cache_miss_total").increment(1);
                None
            }
            Err(err) => {
                counter!("rubrica_cache_error_total").increment(1);
                warn!(error = %err, key = USER_LIST_KEY, "cache read failed, falling back to database");
                None
            }
        }
    }

    /// Best-effort refresh of the user listing after a database read.
    pub async fn store_user_list(&self, users: &[User]) {
        let value = match serde_json::to_value(users) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, key = USER_LIST_KEY, "failed to serialize user listing");
                return;
            }
        };
        if let Err(err) = self
            .store
            .set_value(USER_LIST_KEY, &value, Some(self.user_list_ttl))
            .await
        {
            counter!("rubrica_cache_error_total").increment(1);
            warn!(error = %err, key = USER_LIST_KEY, "cache write failed");
        }
    }

    /// Best-effort invalidation after any user mutation.
    pub async fn invalidate_user_list(&self) {
        match self.store.delete(USER_LIST_KEY).await {
            Ok(_) => {
                counter!("rubrica_cache_invalidation_total").increment(1);
            }
            Err(err) => {
                counter!("rubrica_cache_error_total").increment(1);
                warn!(error = %err, key = USER_LIST_KEY, "cache invalidation failed");
            }
        }
    }

    pub async fn entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let Some(value) = self.store.get_value(key).await? else {
            return Ok(None);
        };
        let ttl = self.store.ttl(key).await?;
        Ok(Some(CacheEntry {
            key: key.to_string(),
            value,
            ttl: Some(ttl),
        }))
    }

    pub async fn put_entry(
        &self,
        key: &str,
        value: Value,
        ttl_seconds: Option<u64>,
    ) -> Result<CacheEntry, CacheError> {
        let ttl = ttl_seconds.map_or(self.default_ttl, Duration::from_secs);
        self.store.set_value(key, &value, Some(ttl)).await?;
        Ok(CacheEntry {
            key: key.to_string(),
            value,
            ttl: Some(ttl.as_secs() as i64),
        })
    }

    /// Every entry matching `pattern`. Keys that expire between the listing
    /// and the read are skipped.
    pub async fn entries(&self, pattern: &str) -> Result<Vec<CacheEntry>, CacheError> {
        let keys = self.store.keys(pattern).await?;
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(entry) = self.entry(&key).await? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Returns true when the key existed.
    pub async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        self.store.delete(key).await
    }

    pub async fn list_keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        self.store.keys(pattern).await
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        self.store.ping().await
    }

    pub async fn flush(&self) -> Result<(), CacheError> {
        self.store.flush().await
    }
}
