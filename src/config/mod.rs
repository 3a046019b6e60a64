use std::env;
use std::time::Duration;

/// 服务配置
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub redis_url: String,
    pub presence_base_url: String,
    pub user_expire_hours: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let user_expire_hours = env::var("USER_EXPIRE_HOURS")
            .unwrap_or_default()
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(48);

        Ok(Config {
            redis_url: env::var("REDIS_URL")?,
            presence_base_url: env::var("PRESENCE_BASE_URL")?,
            user_expire_hours,
        })
    }

    /// 账户回收窗口：超过该时长没有写入的用户缓存可被回收
    pub fn user_expire(&self) -> Duration {
        Duration::from_secs(self.user_expire_hours * 3600)
    }
}
