//! 对象缓存层
//!
//! 缓存后端以插件形式注册（见 [`declare_object_cache_plugin!`]），
//! 启动时根据 `cache.type` 选择具体实现。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 键存在但值无法读取（连接失败等）
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 注册缓存插件
///
/// 插件类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache: $crate::errors::Result<Box<dyn $crate::cache::ObjectCache>> =
                            <$ty>::new()
                                .map(|c| Box::new(c) as Box<dyn $crate::cache::ObjectCache>)
                                .map_err($crate::errors::LmsError::CacheConnection);
                        cache
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_result_into_option() {
        assert_eq!(CacheResult::Found(3).into_option(), Some(3));
        assert_eq!(CacheResult::<i32>::NotFound.into_option(), None);
        assert_eq!(CacheResult::<i32>::ExistsButNoValue.into_option(), None);
    }
}
