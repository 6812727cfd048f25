//! Read-through cache for single-record lookups.
//!
//! The cache is a plain string key-value store. Callers own serialization
//! and invalidation; a missing cache only costs latency.

use async_trait::async_trait;
use dashmap::DashMap;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{CacheBackend, CacheConfig};
use crate::error::{CacheError, ServiceError, ServiceResult};

/// String-by-key cache collaborator
#[async_trait]
pub trait RecordCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Build the cache selected by configuration, or `None` when caching is off
pub async fn from_config(config: &CacheConfig) -> ServiceResult<Option<Arc<dyn RecordCache>>> {
    match config.backend {
        CacheBackend::None => {
            info!("Record cache disabled");
            Ok(None)
        }
        CacheBackend::Memory => {
            info!("Using in-memory record cache");
            Ok(Some(Arc::new(InMemoryCache::new(config.ttl()))))
        }
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| ServiceError::Config {
                message: "cache.redis_url is required when cache.backend is \"redis\"".to_string(),
            })?;
            let cache = RedisCache::connect(url, config.ttl()).await?;
            Ok(Some(Arc::new(cache)))
        }
    }
}

/// Redis-backed cache
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    ttl: Option<Duration>,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("connection", &"ConnectionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl RedisCache {
    pub async fn connect(url: &str, ttl: Option<Duration>) -> Result<Self, CacheError> {
        info!(url, "Connecting to Redis cache");

        let client = redis::Client::open(url).map_err(|source| CacheError::Connection {
            url: url.to_string(),
            source,
        })?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|source| CacheError::Connection {
                url: url.to_string(),
                source,
            })?;

        info!("Connected to Redis cache");
        Ok(Self { conn, ttl })
    }
}

#[async_trait]
impl RecordCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(CacheError::Command)?;
        debug!(key, hit = value.is_some(), "Cache GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        debug!(key, ttl = ?self.ttl, "Cache SET");
        let mut conn = self.conn.clone();

        match self.ttl {
            Some(ttl) => conn
                .set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                .await
                .map_err(CacheError::Command),
            None => conn
                .set::<_, _, ()>(key, value)
                .await
                .map_err(CacheError::Command),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        debug!(key, "Cache DELETE");
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(CacheError::Command)
    }
}

/// Process-local cache for single-instance deployments and tests
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Option<Duration>,
}

#[derive(Debug)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl InMemoryCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RecordCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if entry.expires_at.is_none_or(|at| at > now) => Some(entry.value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        if value.is_none() {
            // Expired
            self.entries.remove(key);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let cache = InMemoryCache::new(None);
        assert_eq!(cache.get("member:1").await.unwrap(), None);

        cache.set("member:1", "{}".to_string()).await.unwrap();
        assert_eq!(cache.get("member:1").await.unwrap().as_deref(), Some("{}"));

        cache.delete("member:1").await.unwrap();
        assert_eq!(cache.get("member:1").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_entries_expire() {
        let cache = InMemoryCache::new(Some(Duration::ZERO));
        cache.set("provider:7", "cached".to_string()).await.unwrap();

        assert_eq!(cache.get("provider:7").await.unwrap(), None);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_disabled_backend_builds_nothing() {
        let cache = from_config(&CacheConfig::default()).await.unwrap();
        assert!(cache.is_none());

        let cache = from_config(&CacheConfig {
            backend: CacheBackend::Memory,
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(cache.is_some());
    }
}
