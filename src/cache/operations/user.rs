use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::cache::client::KvCache;
use crate::cache::keys::user_keys;
use crate::cache::models::user::UserProfile;
use crate::error::StoreError;

/// 新用户两天没有写入会回收账户
pub const USER_EXPIRE: Duration = Duration::from_secs(48 * 3600);

/// 用户目录存储
/// 主记录 user:<id> -> 用户资料，两个二级索引 phone:<号码> / nickname:<昵称> -> 用户ID
/// 三类键各自独立过期，跨键一致性是尽力而为的（底层只有单键操作）
pub struct UserStore {
    cache: Arc<dyn KvCache>,
    ttl: Duration,
}

impl UserStore {
    pub fn new(cache: Arc<dyn KvCache>) -> Self {
        Self::with_ttl(cache, USER_EXPIRE)
    }

    /// 指定主记录与索引的过期时间，零表示不过期
    pub fn with_ttl(cache: Arc<dyn KvCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// 插入一条用户信息，返回用户ID
    /// 失败时记录用户ID便于排查，错误本身携带出错的键
    pub async fn add(&self, user: &mut UserProfile) -> Result<i64, StoreError> {
        user.create_time = Utc::now().timestamp();
        let user_id = user.user_id;
        if let Err(e) = self.save(user).await {
            tracing::error!(user_id, error = %e, "failed to add user");
            return Err(e);
        }
        Ok(user_id)
    }

    /// 获取用户信息，键不存在返回 None
    pub async fn get(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        let key = user_keys::user_key(user_id);
        let value = self
            .cache
            .get(&key)
            .await
            .map_err(|e| StoreError::Cache {
                op: "get",
                key: key.clone(),
                source: e,
            })?;
        match value {
            Some(json) => {
                let user =
                    serde_json::from_str(&json).map_err(|e| StoreError::Codec { key, source: e })?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// 保存用户信息：user id -> user，phone/nickname 有效时记录对应索引
    /// 三次写入相互独立，遇到第一个失败即返回，不回滚已完成的写入
    pub async fn save(&self, user: &mut UserProfile) -> Result<(), StoreError> {
        user.update_time = Utc::now().timestamp();

        // 先读旧记录，手机号或昵称变更时清理指向本用户的旧索引
        // 旧记录损坏时视同不存在，不阻塞覆盖写入
        let previous = match self.get(user.user_id).await {
            Ok(previous) => previous,
            Err(StoreError::Codec { key, source }) => {
                tracing::warn!(key = %key, error = %source, "overwriting corrupt user record");
                None
            }
            Err(e) => return Err(e),
        };

        let key = user_keys::user_key(user.user_id);
        let json = serde_json::to_string(user).map_err(|e| StoreError::Codec {
            key: key.clone(),
            source: e,
        })?;
        self.cache
            .set(&key, &json, self.ttl)
            .await
            .map_err(|e| StoreError::Cache {
                op: "set",
                key,
                source: e,
            })?;

        if let Some(previous) = previous {
            self.clean_stale_indexes(&previous, user).await?;
        }

        // 如果 phone 有效，记录 phone -> user id
        if !user.phone_number.is_empty() {
            self.set_index(&user_keys::phone_key(&user.phone_number), user.user_id)
                .await?;
        }

        // 如果 nickname 有效，记录 nickname -> user id
        if !user.nickname.is_empty() {
            self.set_index(&user_keys::nickname_key(&user.nickname), user.user_id)
                .await?;
        }

        Ok(())
    }

    /// 根据手机号获取用户信息
    /// 索引存在但主记录已被回收时返回 None，调用方不得假设索引命中即主记录命中
    pub async fn get_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        let user_id = self
            .resolve_index(&user_keys::phone_key(phone_number))
            .await?;
        self.get(user_id).await
    }

    /// 根据昵称获取用户信息，契约与 get_by_phone_number 一致
    pub async fn get_by_nickname(&self, nickname: &str) -> Result<Option<UserProfile>, StoreError> {
        let user_id = self
            .resolve_index(&user_keys::nickname_key(nickname))
            .await?;
        self.get(user_id).await
    }

    /// 批量获取用户信息，结果与输入等长且顺序一致，未命中以 None 占位
    /// 遇到第一个底层错误即返回
    // TODO: 改用一次 MGET 往返
    pub async fn get_by_ids(&self, user_ids: &[i64]) -> Result<Vec<Option<UserProfile>>, StoreError> {
        let mut users = Vec::with_capacity(user_ids.len());
        for &user_id in user_ids {
            users.push(self.get(user_id).await?);
        }
        Ok(users)
    }

    /// 查询用户：先按手机号再按昵称解析，结果按用户ID去重
    /// 任一路径的索引未命中不会中止另一路径，也不会在结果中留下空位
    pub async fn search(&self, key: &str) -> Result<Vec<UserProfile>, StoreError> {
        let mut users: Vec<UserProfile> = Vec::new();

        match self.get_by_phone_number(key).await {
            Ok(Some(user)) => users.push(user),
            Ok(None) => {}
            Err(e) if e.is_index_miss() => {}
            Err(e) => return Err(e),
        }

        match self.get_by_nickname(key).await {
            Ok(Some(user)) => {
                if !users.iter().any(|u| u.user_id == user.user_id) {
                    users.push(user);
                }
            }
            Ok(None) => {}
            Err(e) if e.is_index_miss() => {}
            Err(e) => return Err(e),
        }

        Ok(users)
    }

    /// 写入二级索引，索引值为十进制用户ID文本，与主记录共用过期时间
    async fn set_index(&self, key: &str, user_id: i64) -> Result<(), StoreError> {
        self.cache
            .set(key, &user_id.to_string(), self.ttl)
            .await
            .map_err(|e| StoreError::Cache {
                op: "set",
                key: key.to_string(),
                source: e,
            })
    }

    /// 解析二级索引，返回其指向的用户ID
    async fn resolve_index(&self, key: &str) -> Result<i64, StoreError> {
        let value = self
            .cache
            .get(key)
            .await
            .map_err(|e| StoreError::Cache {
                op: "get",
                key: key.to_string(),
                source: e,
            })?;
        let value = match value {
            Some(value) => value,
            None => {
                return Err(StoreError::IndexMiss {
                    key: key.to_string(),
                });
            }
        };
        match value.trim().parse::<i64>() {
            Ok(user_id) => Ok(user_id),
            Err(_) => {
                tracing::warn!(key, value = %value, "secondary index holds unparsable user id");
                Err(StoreError::IndexParse {
                    key: key.to_string(),
                    value,
                })
            }
        }
    }

    /// 手机号或昵称变更后，删除仍指向本用户的旧索引，避免悬空跳转
    /// 已被其他用户重新占用的索引键保持不动
    async fn clean_stale_indexes(
        &self,
        previous: &UserProfile,
        current: &UserProfile,
    ) -> Result<(), StoreError> {
        if !previous.phone_number.is_empty() && previous.phone_number != current.phone_number {
            self.del_index_if_owned(
                &user_keys::phone_key(&previous.phone_number),
                current.user_id,
            )
            .await?;
        }
        if !previous.nickname.is_empty() && previous.nickname != current.nickname {
            self.del_index_if_owned(
                &user_keys::nickname_key(&previous.nickname),
                current.user_id,
            )
            .await?;
        }
        Ok(())
    }

    /// 仅当索引仍解析到该用户时删除
    async fn del_index_if_owned(&self, key: &str, user_id: i64) -> Result<(), StoreError> {
        match self.resolve_index(key).await {
            Ok(owner) if owner == user_id => {
                tracing::debug!(key, "removing stale secondary index");
                self.cache.del(key).await.map_err(|e| StoreError::Cache {
                    op: "del",
                    key: key.to_string(),
                    source: e,
                })
            }
            Ok(_) => Ok(()),
            Err(e) if e.is_index_miss() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
