pub mod cache;
pub mod config;
pub mod error;
pub mod presence;
pub mod result;

pub use cache::client::{CacheError, KvCache, MemoryCache, RedisCache};
pub use cache::models::user::UserProfile;
pub use cache::operations::user::{USER_EXPIRE, UserStore};
pub use error::{PresenceError, StoreError};
pub use presence::{DevicePresence, DeviceRef, HttpDevicePresence};
