//! 存储层数据模型
//!
//! - 用户模型：UserRecord, NewUser
//! - refresh token 台账模型：RefreshTokenRecord

use domain::{Role, SessionUser};

/// refresh token 台账记录的类型标签（当前只有 refresh 一种）。
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// 用户记录（含口令哈希，禁止直接序列化给客户端）。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub school_id: Option<i64>,
}

impl UserRecord {
    /// 转换为会话上下文（丢弃口令哈希）。
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser {
            user_id: self.user_id,
            email: self.email.clone(),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            school_id: self.school_id,
        }
    }
}

/// 注册写入输入（user_id 由存储分配）。
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub school_id: Option<i64>,
}

/// refresh token 台账记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: i64,
    pub token_type: String,
    /// 过期时间（Unix 秒）。
    pub expires_at: u64,
}

impl RefreshTokenRecord {
    pub fn new(token: impl Into<String>, user_id: i64, expires_at: u64) -> Self {
        Self {
            token: token.into(),
            user_id,
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            expires_at,
        }
    }

    /// 在给定时刻是否已过期。
    pub fn is_expired_at(&self, now_epoch_seconds: u64) -> bool {
        self.expires_at <= now_epoch_seconds
    }
}
