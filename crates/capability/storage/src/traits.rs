//! 存储接口定义
//!
//! - UserStore：用户存储（凭据存储协作方）
//! - RefreshTokenStore：refresh token 台账存储
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发（`Arc<dyn ...>`）

use crate::error::StorageError;
use crate::models::{NewUser, RefreshTokenRecord, UserRecord};
use async_trait::async_trait;

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据 email/用户名查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据 user_id 查找用户
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError>;

    /// 创建用户；email 已存在时返回 conflict 错误
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, StorageError>;

    /// 更新口令哈希，返回是否命中
    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StorageError>;
}

/// refresh token 台账存储接口
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// 写入台账记录
    async fn insert_refresh_token(&self, record: RefreshTokenRecord) -> Result<(), StorageError>;

    /// 按 token 查找
    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError>;

    /// 按 token 删除，返回是否存在
    async fn delete_refresh_token(&self, token: &str) -> Result<bool, StorageError>;

    /// 原子地删除并返回记录（同一 token 并发调用只有一方拿到记录）
    async fn take_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError>;

    /// 删除某用户的全部记录，返回删除条数
    async fn delete_refresh_tokens_for_user(&self, user_id: i64) -> Result<u64, StorageError>;
}
