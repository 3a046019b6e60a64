// 缓存操作逻辑
pub mod user;

pub use user::UserStore;
