use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 每个条目按写入时给定的 TTL 过期
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// 进程内缓存，单实例部署时的默认后端
pub struct MokaCacheWrapper {
    entries: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let cache = &AppConfig::get().cache;
        Ok(Self::with_settings(cache.memory.max_capacity, cache.default_ttl))
    }

    /// 指定容量和默认 TTL（秒）
    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Self {
        debug!(
            "Moka cache ready (capacity {}, default ttl {}s)",
            max_capacity, ttl_secs
        );
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(EntryTtl)
                .build(),
            default_ttl: Duration::from_secs(ttl_secs),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.entries.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => {
                trace!("moka miss: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = match ttl {
            0 => self.default_ttl,
            secs => Duration::from_secs(secs),
        };
        self.entries.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("account:token".into(), "{}".into(), 0)
            .await;
        assert_eq!(
            cache.get_raw("account:token").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("account:token").await;
        assert_eq!(cache.get_raw("account:token").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_per_entry_ttl_expires() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache.insert_raw("short".into(), "v".into(), 1).await;
        cache.insert_raw("long".into(), "v".into(), 0).await;

        std::thread::sleep(Duration::from_millis(1_200));

        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
        assert_eq!(
            cache.get_raw("long").await,
            CacheResult::Found("v".to_string())
        );
    }
}
