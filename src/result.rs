use serde::Deserialize;

/// 外部服务（如在线状态服务）应答的统一信封
/// 本核心只消费该格式，不产生
#[derive(Debug, Deserialize)]
pub struct ApiResult<T> {
    pub code: i32,
    pub error_message: Option<String>,
    pub content: Option<T>,
}
