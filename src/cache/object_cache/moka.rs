use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(config: &CacheConfig) -> Result<Self, String> {
        Ok(Self::with_capacity(
            config.memory.max_capacity,
            config.default_ttl,
        ))
    }

    pub fn with_capacity(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(std::time::Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}",
            max_capacity
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // Moka 使用构建时的全局 TTL
        self.inner.insert(key, value).await;
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL, using global TTL configuration");
        }
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_typed_roundtrip_and_remove() {
        let cache: Box<dyn ObjectCache> = Box::new(MokaCacheWrapper::with_capacity(16, 60));
        cache.insert("user:abc".to_string(), &42_i64, 0).await;
        assert_eq!(cache.get::<i64>("user:abc").await, CacheResult::Found(42));

        cache.remove("user:abc").await;
        assert_eq!(cache.get::<i64>("user:abc").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_undecodable_value() {
        let cache: Box<dyn ObjectCache> = Box::new(MokaCacheWrapper::with_capacity(16, 60));
        cache
            .insert_raw("k".to_string(), "not json".to_string(), 0)
            .await;
        assert_eq!(cache.get::<i64>("k").await, CacheResult::ExistsButNoValue);
    }
}
