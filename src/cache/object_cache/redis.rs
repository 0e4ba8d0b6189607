use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, info};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// 多实例部署时共享登录态缓存，所有键带统一前缀
pub struct RedisObjectCache {
    client: redis::Client,
    prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis = &config.cache.redis;

        let client = redis::Client::open(redis.url.as_str())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis.url))?;

        // 启动阶段同步 PING 一次，失败时由调用方回退到内存缓存
        let pong: String = client
            .get_connection()
            .and_then(|mut conn| redis::cmd("PING").query(&mut conn))
            .map_err(|e| {
                error!("Redis at {} is unreachable: {}", redis.url, e);
                format!("Redis connection failed: {e}")
            })?;
        debug!("Redis answered {} (key prefix '{}')", pong, redis.key_prefix);

        Ok(Self {
            client,
            prefix: redis.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.key(key)).await {
            Ok(Some(value)) => CacheResult::Found(value),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Redis GET '{}' failed: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn.set_ex::<_, _, ()>(self.key(&key), value, ttl).await {
            error!("Redis SETEX '{}' failed: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        if let Err(e) = conn.del::<_, ()>(self.key(key)).await {
            error!("Redis DEL '{}' failed: {}", key, e);
        }
    }

    /// 删除本应用前缀下的全部键
    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{}*", self.prefix);
        let mut cursor: u64 = 0;
        let mut keys: Vec<String> = Vec::new();
        loop {
            let page: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(500)
                .query_async(&mut conn)
                .await;
            match page {
                Ok((next, batch)) => {
                    keys.extend(batch);
                    if next == 0 {
                        break;
                    }
                    cursor = next;
                }
                Err(e) => {
                    error!("Redis SCAN '{}' failed: {}", pattern, e);
                    return;
                }
            }
        }

        if keys.is_empty() {
            return;
        }
        match conn.del::<_, usize>(&keys).await {
            Ok(removed) => info!("Cleared {} cached entries under '{}'", removed, self.prefix),
            Err(e) => error!("Redis DEL during invalidate_all failed: {}", e),
        }
    }
}
