use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use thiserror::Error;
use tokio::sync::Mutex;

/// 缓存访问错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// 键值缓存客户端
/// 所有操作均为单键操作，不提供跨键原子性；未命中返回 None，不是错误
#[async_trait]
pub trait KvCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// ttl 为零表示使用存储默认策略（不设置过期时间）
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn del(&self, key: &str) -> Result<(), CacheError>;
}

/// Redis 缓存客户端
pub struct RedisCache {
    client: Arc<RedisClient>,
}

impl RedisCache {
    pub fn new(client: Arc<RedisClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KvCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        if ttl.is_zero() {
            let _: () = conn.set(key, value).await?;
        } else {
            let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// 内存缓存客户端，用于测试和本地开发
/// 不支持过期（ttl 被忽略）；set_broken 可模拟后端故障
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    broken: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记后端故障，后续所有操作返回 Unavailable
    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("memory cache marked broken".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KvCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check()?;
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), CacheError> {
        self.check()?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.check()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_cache_miss_is_none() {
        let cache = MemoryCache::new();
        assert!(cache.get("user:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_cache_set_get_del() {
        let cache = MemoryCache::new();
        cache.set("phone:111", "1", Duration::ZERO).await.unwrap();
        assert_eq!(cache.get("phone:111").await.unwrap().as_deref(), Some("1"));
        cache.del("phone:111").await.unwrap();
        assert!(cache.get("phone:111").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn broken_cache_errors_on_every_op() {
        let cache = MemoryCache::new();
        cache.set_broken(true);
        assert!(matches!(
            cache.get("user:1").await,
            Err(CacheError::Unavailable(_))
        ));
        assert!(cache.set("user:1", "{}", Duration::ZERO).await.is_err());
        assert!(cache.del("user:1").await.is_err());
    }
}
