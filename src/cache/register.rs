//! 缓存后端注册表
//!
//! 各后端模块通过 `declare_object_cache_plugin!` 在进程启动前登记构造函数，
//! 启动阶段按 `cache.type` 取出并调用。

use crate::cache::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

type Registry = RwLock<BTreeMap<&'static str, ObjectCacheConstructor>>;

static BACKENDS: Lazy<Registry> = Lazy::new(Default::default);

pub fn register_object_cache_plugin(name: &'static str, constructor: ObjectCacheConstructor) {
    // 锁中毒时仍然写入，注册发生在 main 之前
    let mut backends = BACKENDS.write().unwrap_or_else(|e| e.into_inner());
    if backends.insert(name, constructor).is_some() {
        tracing::warn!("Cache backend '{}' registered twice, keeping the last one", name);
    }
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    let backends = BACKENDS.read().unwrap_or_else(|e| e.into_inner());
    backends.get(name).cloned()
}

/// 已注册的后端名称（有序）
pub fn registered_backends() -> Vec<&'static str> {
    let backends = BACKENDS.read().unwrap_or_else(|e| e.into_inner());
    backends.keys().copied().collect()
}

pub fn debug_object_cache_registry() {
    match registered_backends().as_slice() {
        [] => tracing::debug!("No cache backends registered"),
        names => tracing::debug!("Cache backends available: {}", names.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        let names = registered_backends();
        assert!(names.contains(&"moka"));
        assert!(names.contains(&"redis"));
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
