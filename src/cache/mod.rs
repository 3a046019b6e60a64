// 缓存模块
// 包含缓存客户端抽象、数据结构和操作逻辑

pub mod client;
pub mod keys;
pub mod models;
pub mod operations;

// 重新导出常用类型和函数，方便其他模块使用
pub use client::{CacheError, KvCache, MemoryCache, RedisCache};
pub use models::user::UserProfile;
pub use operations::user::{USER_EXPIRE, UserStore};
