/// 用户主记录缓存键前缀
const USER_PREFIX: &str = "user:";

/// 手机号二级索引键前缀
const PHONE_PREFIX: &str = "phone:";

/// 昵称二级索引键前缀
const NICKNAME_PREFIX: &str = "nickname:";

/// 生成用户主记录缓存键
pub fn user_key(user_id: i64) -> String {
    format!("{}{}", USER_PREFIX, user_id)
}

/// 生成手机号索引键
pub fn phone_key(phone_number: &str) -> String {
    format!("{}{}", PHONE_PREFIX, phone_number)
}

/// 生成昵称索引键
pub fn nickname_key(nickname: &str) -> String {
    format!("{}{}", NICKNAME_PREFIX, nickname)
}
