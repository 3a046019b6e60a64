use serde::{Deserialize, Serialize};

/// 用户资料缓存数据模型
/// 以 JSON 存储在 `user:<id>` 键下
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// 用户ID，由外部分配，全局唯一
    pub user_id: i64,
    /// 手机号，空字符串表示未设置
    pub phone_number: String,
    /// 昵称，空字符串表示未设置
    pub nickname: String,
    pub sex: i32,
    pub avatar_url: String,
    /// 业务扩展字段，本层不做解释，原样透传
    pub extra: String,
    pub create_time: i64, // Unix timestamp
    pub update_time: i64, // Unix timestamp
}

impl UserProfile {
    /// 构造仅填基础字段的用户资料，时间戳由 add/save 写入
    pub fn new(user_id: i64, phone_number: &str, nickname: &str) -> Self {
        Self {
            user_id,
            phone_number: phone_number.to_string(),
            nickname: nickname.to_string(),
            sex: 0,
            avatar_url: String::new(),
            extra: String::new(),
            create_time: 0,
            update_time: 0,
        }
    }
}
