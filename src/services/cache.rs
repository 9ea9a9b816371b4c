use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::models::{Profile, ProfileDraft, ProfileId};
use crate::services::store::{ProfileStore, StoreError};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// Implements L1 (in-memory) and L2 (Redis) caching strategy.
/// L1 is fastest but limited in size, L2 is shared across instances.
/// Without Redis the manager runs L1-only.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            ..Self::in_memory(l1_size, ttl_secs)
        })
    }

    /// Create an L1-only cache manager
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis: None,
            l1_cache,
            ttl_secs,
        }
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both L1 and L2)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache.insert(key.to_string(), json.as_bytes().to_vec()).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("DEL")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub fn has_redis(&self) -> bool {
        self.redis.is_some()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            l2_enabled: self.has_redis(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub l2_enabled: bool,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a profile by id
    pub fn profile(profile_id: ProfileId) -> String {
        format!("profile:{}", profile_id)
    }

    /// Build a cache key for the owner -> profile lookup
    pub fn owner(owner_id: &str) -> String {
        format!("owner:{}", owner_id)
    }
}

/// Read-through profile cache in front of another `ProfileStore`
///
/// Point lookups are cached; candidate listings always hit the inner store.
/// Cache failures are logged and fall through.
pub struct CachedProfileStore {
    inner: Arc<dyn ProfileStore>,
    cache: Arc<CacheManager>,
}

impl CachedProfileStore {
    pub fn new(inner: Arc<dyn ProfileStore>, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }

    async fn remember(&self, profile: &Profile) {
        for key in [CacheKey::profile(profile.id), CacheKey::owner(&profile.owner_id)] {
            if let Err(e) = self.cache.set(&key, profile).await {
                tracing::warn!("Failed to cache profile {}: {}", profile.id, e);
            }
        }
    }
}

#[async_trait]
impl ProfileStore for CachedProfileStore {
    async fn get_by_id(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        match self.cache.get::<Profile>(&CacheKey::profile(id)).await {
            Ok(profile) => return Ok(Some(profile)),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Profile cache read failed: {}", e),
        }

        let profile = self.inner.get_by_id(id).await?;
        if let Some(profile) = &profile {
            self.remember(profile).await;
        }
        Ok(profile)
    }

    async fn get_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, StoreError> {
        match self.cache.get::<Profile>(&CacheKey::owner(owner_id)).await {
            Ok(profile) => return Ok(Some(profile)),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Profile cache read failed: {}", e),
        }

        let profile = self.inner.get_by_owner(owner_id).await?;
        if let Some(profile) = &profile {
            self.remember(profile).await;
        }
        Ok(profile)
    }

    async fn list_excluding(&self, ids: &HashSet<ProfileId>) -> Result<Vec<Profile>, StoreError> {
        self.inner.list_excluding(ids).await
    }

    async fn upsert_for_owner(&self, owner_id: &str, draft: &ProfileDraft) -> Result<Profile, StoreError> {
        let profile = self.inner.upsert_for_owner(owner_id, draft).await?;

        for key in [CacheKey::profile(profile.id), CacheKey::owner(owner_id)] {
            if let Err(e) = self.cache.delete(&key).await {
                tracing::warn!("Failed to invalidate cache: {}", e);
            }
        }

        Ok(profile)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.inner.health_check().await
    }
}
