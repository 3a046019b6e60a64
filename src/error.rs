use thiserror::Error;

use crate::cache::client::CacheError;

/// 用户目录存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 二级索引键不存在，调用方应按未命中处理
    #[error("index key {key} not found")]
    IndexMiss { key: String },

    /// 二级索引内容无法解析为用户ID，对调用方等同于索引未命中
    #[error("index key {key} holds invalid user id: {value}")]
    IndexParse { key: String, value: String },

    /// 底层缓存操作失败
    #[error("cache {op} failed for key {key}: {source}")]
    Cache {
        op: &'static str,
        key: String,
        #[source]
        source: CacheError,
    },

    /// 缓存中的用户资料序列化/反序列化失败
    #[error("codec failed for key {key}: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// 索引未命中（含内容解析失败）不是硬错误，聚合操作按未命中对待
    pub fn is_index_miss(&self) -> bool {
        matches!(
            self,
            StoreError::IndexMiss { .. } | StoreError::IndexParse { .. }
        )
    }
}

/// 在线状态子系统错误
#[derive(Debug, Error)]
pub enum PresenceError {
    /// 在线状态服务不可达，区别于"用户无在线设备"
    #[error("presence service unreachable: {0}")]
    Unavailable(String),

    /// 在线状态服务应答无法按协议解析，区别于网络不可达
    #[error("presence service returned malformed response: {0}")]
    Malformed(String),

    /// 在线状态服务返回业务错误
    #[error("presence service rejected request: code={code} message={message}")]
    Service { code: i32, message: String },
}
