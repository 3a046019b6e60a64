use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::PresenceError;
use crate::result::ApiResult;

/// 设备连接信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceRef {
    pub device_id: i64,
    pub user_id: i64,
    /// 设备当前连接的网关地址
    pub conn_addr: String,
    pub client_version: String,
}

/// 在线设备查询能力，由外部在线状态子系统实现
/// 消息投递逻辑据此决定把消息推到哪些设备连接
#[async_trait]
pub trait DevicePresence: Send + Sync {
    /// 查询用户当前在线的设备列表
    /// 无在线设备返回空列表；服务不可达返回 Unavailable，二者必须区分
    async fn list_online_by_user_id(&self, user_id: i64)
    -> Result<Vec<DeviceRef>, PresenceError>;
}

/// 基于 HTTP 的在线状态服务适配器
pub struct HttpDevicePresence {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDevicePresence {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DevicePresence for HttpDevicePresence {
    async fn list_online_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<DeviceRef>, PresenceError> {
        let url = format!("{}/devices/online?user_id={}", self.base_url, user_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PresenceError::Unavailable(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| PresenceError::Unavailable(e.to_string()))?;
        unwrap_envelope(decode_envelope(&body)?)
    }
}

/// 解析统一响应信封，应答不符合协议映射为 Malformed，区别于传输失败
fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<ApiResult<T>, PresenceError> {
    serde_json::from_str(body).map_err(|e| PresenceError::Malformed(e.to_string()))
}

/// 解包信封：非零 code 为业务错误，content 缺省视为空结果
fn unwrap_envelope<T: Default>(result: ApiResult<T>) -> Result<T, PresenceError> {
    if result.code != 0 {
        return Err(PresenceError::Service {
            code: result.code,
            message: result.error_message.unwrap_or_default(),
        });
    }
    Ok(result.content.unwrap_or_default())
}
