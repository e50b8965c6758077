//! refresh token 台账。
//!
//! 一条 refresh token 只有在 JWT 校验通过且台账中存在未过期记录时才有效。
//! 过期时间由服务端按签发时刻计算，从不接受客户端输入。

use crate::AuthError;
use crate::jwt::now_epoch_seconds;
use mm_storage::{RefreshTokenRecord, RefreshTokenStore, StorageError};
use std::sync::Arc;

/// 默认有效期：7 天。
pub const DEFAULT_REFRESH_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

pub struct RefreshTokenLedger {
    store: Arc<dyn RefreshTokenStore>,
    ttl_seconds: u64,
}

impl RefreshTokenLedger {
    pub fn new(store: Arc<dyn RefreshTokenStore>, ttl_seconds: u64) -> Self {
        Self { store, ttl_seconds }
    }

    /// 记录新签发的 refresh token，过期时间 = 当前时刻 + 固定时长。
    pub async fn store(&self, user_id: i64, token: &str) -> Result<(), AuthError> {
        let expires_at = now_epoch_seconds().saturating_add(self.ttl_seconds);
        self.store
            .insert_refresh_token(RefreshTokenRecord::new(token, user_id, expires_at))
            .await
            .map_err(storage_failure)
    }

    /// 校验台账记录；过期记录顺手删除。轮换不走这里，而是用 `consume` 原子消费。
    pub async fn validate(&self, token: &str) -> Result<bool, AuthError> {
        let Some(record) = self
            .store
            .find_refresh_token(token)
            .await
            .map_err(storage_failure)?
        else {
            return Ok(false);
        };
        if record.is_expired_at(now_epoch_seconds()) {
            self.revoke(token).await?;
            return Ok(false);
        }
        Ok(true)
    }

    /// 无条件删除。
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.store
            .delete_refresh_token(token)
            .await
            .map(|_| ())
            .map_err(storage_failure)
    }

    /// 原子消费：删除并返回记录。并发消费同一 token 只有一方成功；
    /// 已过期的记录同样被删除，但视为无效。
    pub async fn consume(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let record = self
            .store
            .take_refresh_token(token)
            .await
            .map_err(storage_failure)?;
        Ok(record.filter(|record| !record.is_expired_at(now_epoch_seconds())))
    }

    /// 删除某身份的全部记录，返回删除条数。
    pub async fn revoke_all(&self, user_id: i64) -> Result<u64, AuthError> {
        self.store
            .delete_refresh_tokens_for_user(user_id)
            .await
            .map_err(storage_failure)
    }
}

fn storage_failure(err: StorageError) -> AuthError {
    AuthError::Internal(err.to_string())
}
