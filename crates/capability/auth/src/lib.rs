//! 认证能力：口令哈希、JWT 签发与校验、refresh 台账与认证流程。

mod jwt;
mod ledger;
mod password;

use async_trait::async_trait;
use domain::{Role, SessionUser};
use mm_storage::{NewUser, RefreshTokenStore, StorageError, UserRecord, UserStore};
use std::sync::Arc;

pub use jwt::{JwtManager, TokenPayload};
pub use ledger::{DEFAULT_REFRESH_TTL_SECONDS, RefreshTokenLedger};
pub use password::{hash_password, verify_dummy_password, verify_password};

/// 口令最小长度（注册与管理员重置共用）。
pub const MIN_PASSWORD_LEN: usize = 8;

/// 认证相关错误。
///
/// 在流程边界构造；HTTP 层据此映射状态码，存储错误细节只进日志。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token invalid")]
    TokenInvalid,
    #[error("{0}")]
    Forbidden(String),
    #[error("user already exists")]
    Conflict,
    #[error("{0}")]
    Validation(String),
    #[error("user not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 登录/注册/刷新返回的 token 对。
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// access token 过期时间（Unix 秒）。
    pub access_expires_at: u64,
    /// refresh token 过期时间（Unix 秒）。
    pub refresh_expires_at: u64,
}

/// 注册输入（已完成字段裁剪，角色已解析）。
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub school_id: Option<i64>,
}

/// 认证服务实现（基于 UserStore + RefreshTokenStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    ledger: RefreshTokenLedger,
    jwt: JwtManager,
    school_scoped_admin_reset: bool,
}

impl AuthService {
    /// 创建认证服务实例；台账有效期与 refresh token 有效期一致。
    pub fn new(
        user_store: Arc<dyn UserStore>,
        refresh_store: Arc<dyn RefreshTokenStore>,
        jwt: JwtManager,
    ) -> Self {
        let ledger = RefreshTokenLedger::new(refresh_store, jwt.refresh_ttl_seconds());
        Self {
            user_store,
            ledger,
            jwt,
            school_scoped_admin_reset: true,
        }
    }

    /// 管理员重置口令是否限定在本校范围内（默认限定）。
    pub fn with_school_scoped_admin_reset(mut self, enabled: bool) -> Self {
        self.school_scoped_admin_reset = enabled;
        self
    }

    /// 注册：已存在则冲突，不写入任何身份或台账记录。
    pub async fn register(
        &self,
        registration: Registration,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        let email = registration.email.trim().to_string();
        if email.is_empty() {
            return Err(AuthError::Validation("email required".to_string()));
        }
        ensure_password_len(&registration.password)?;

        let existing = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(|err| storage_failure("register", err))?;
        if existing.is_some() {
            tracing::info!(operation = "register", "registration conflict");
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(&registration.password)?;
        let user = self
            .user_store
            .create_user(NewUser {
                email,
                password_hash,
                role: registration.role,
                first_name: registration.first_name,
                last_name: registration.last_name,
                school_id: registration.school_id,
            })
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    AuthError::Conflict
                } else {
                    storage_failure("register", err)
                }
            })?;

        let tokens = self.issue_and_record(&user).await?;
        tracing::info!(user_id = user.user_id, operation = "register", "user registered");
        Ok((user, tokens))
    }

    /// 登录校验并签发 token。身份不存在与口令错误返回同一错误。
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        let user = self
            .user_store
            .find_by_email(email.trim())
            .await
            .map_err(|err| storage_failure("login", err))?;
        let Some(user) = user else {
            // 同样跑一次 Argon2 校验，避免按响应耗时探测身份是否存在
            verify_dummy_password(password);
            tracing::info!(operation = "login", "login rejected");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&user.password_hash, password) {
            tracing::info!(user_id = user.user_id, operation = "login", "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_and_record(&user).await?;
        tracing::info!(user_id = user.user_id, operation = "login", "login succeeded");
        Ok((user, tokens))
    }

    /// 校验 access token 并加载会话上下文；身份已不存在同样视为未认证。
    pub async fn authenticate(&self, access_token: &str) -> Result<SessionUser, AuthError> {
        let payload = self
            .jwt
            .decode_access(access_token)
            .ok_or(AuthError::TokenInvalid)?;
        let user = self
            .user_store
            .find_by_id(payload.user_id)
            .await
            .map_err(|err| storage_failure("authenticate", err))?
            .ok_or(AuthError::TokenInvalid)?;
        Ok(user.to_session_user())
    }

    /// 使用 refresh token 换取新 token 对（轮换）。
    ///
    /// 旧 token 先从台账原子移除，因此无论后续步骤成败都不可再用。
    pub async fn refresh(&self, refresh_token: &str) -> Result<(UserRecord, AuthTokens), AuthError> {
        let Some(record) = self.ledger.consume(refresh_token).await? else {
            tracing::info!(operation = "refresh", "refresh rejected: not in ledger");
            return Err(AuthError::TokenInvalid);
        };
        let Some(payload) = self.jwt.decode_refresh(refresh_token) else {
            tracing::info!(
                user_id = record.user_id,
                operation = "refresh",
                "refresh rejected: token invalid"
            );
            return Err(AuthError::TokenInvalid);
        };
        if payload.user_id != record.user_id {
            tracing::warn!(
                user_id = record.user_id,
                operation = "refresh",
                "refresh rejected: owner mismatch"
            );
            return Err(AuthError::TokenInvalid);
        }
        let user = self
            .user_store
            .find_by_id(payload.user_id)
            .await
            .map_err(|err| storage_failure("refresh", err))?
            .ok_or(AuthError::TokenInvalid)?;

        let tokens = self.issue_and_record(&user).await?;
        tracing::info!(user_id = user.user_id, operation = "refresh", "refresh rotated");
        Ok((user, tokens))
    }

    /// 登出：若带了 refresh token 则从台账移除。幂等。
    pub async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        if let Some(token) = refresh_token {
            self.ledger.revoke(token).await?;
        }
        tracing::info!(
            operation = "logout",
            revoked = refresh_token.is_some(),
            "logout completed"
        );
        Ok(())
    }

    /// 移除某身份的全部 refresh token（所有设备下线）。
    pub async fn logout_all(&self, user_id: i64) -> Result<u64, AuthError> {
        let revoked = self.ledger.revoke_all(user_id).await?;
        tracing::info!(user_id, operation = "logout_all", revoked, "sessions revoked");
        Ok(revoked)
    }

    /// 管理员重置他人口令。已签发的会话不受影响。
    pub async fn admin_reset_password(
        &self,
        actor: &SessionUser,
        target_user_id: i64,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if actor.role != Role::Admin {
            return Err(AuthError::Forbidden("admin access required".to_string()));
        }
        ensure_password_len(new_password)?;

        let target = self
            .user_store
            .find_by_id(target_user_id)
            .await
            .map_err(|err| storage_failure("admin_reset_password", err))?
            .ok_or(AuthError::NotFound)?;
        if self.school_scoped_admin_reset && !actor.same_school(target.school_id) {
            tracing::warn!(
                user_id = actor.user_id,
                target_user_id,
                operation = "admin_reset_password",
                "reset rejected: target outside school"
            );
            return Err(AuthError::Forbidden(
                "can only reset passwords within your school".to_string(),
            ));
        }

        let password_hash = hash_password(new_password)?;
        let updated = self
            .user_store
            .update_password_hash(target_user_id, &password_hash)
            .await
            .map_err(|err| storage_failure("admin_reset_password", err))?;
        if !updated {
            return Err(AuthError::NotFound);
        }
        tracing::info!(
            user_id = actor.user_id,
            target_user_id,
            operation = "admin_reset_password",
            "password reset"
        );
        Ok(())
    }

    async fn issue_and_record(&self, user: &UserRecord) -> Result<AuthTokens, AuthError> {
        let tokens = self.jwt.issue_tokens(&TokenPayload {
            user_id: user.user_id,
            email: user.email.clone(),
            role: user.role,
        })?;
        self.ledger.store(user.user_id, &tokens.refresh_token).await?;
        Ok(tokens)
    }
}

fn ensure_password_len(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn storage_failure(operation: &'static str, err: StorageError) -> AuthError {
    tracing::error!(operation, error = %err, "credential store failure");
    AuthError::Internal(err.to_string())
}

/// 认证能力 trait，便于替换实现与测试。
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<(UserRecord, AuthTokens), AuthError>;
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError>;
    async fn authenticate(&self, access_token: &str) -> Result<SessionUser, AuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<(UserRecord, AuthTokens), AuthError>;
    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError>;
    async fn logout_all(&self, user_id: i64) -> Result<u64, AuthError>;
    async fn admin_reset_password(
        &self,
        actor: &SessionUser,
        target_user_id: i64,
        new_password: &str,
    ) -> Result<(), AuthError>;
}

#[async_trait]
impl Authenticator for AuthService {
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        AuthService::register(self, registration).await
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, AuthTokens), AuthError> {
        AuthService::login(self, email, password).await
    }

    async fn authenticate(&self, access_token: &str) -> Result<SessionUser, AuthError> {
        AuthService::authenticate(self, access_token).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<(UserRecord, AuthTokens), AuthError> {
        AuthService::refresh(self, refresh_token).await
    }

    async fn logout(&self, refresh_token: Option<&str>) -> Result<(), AuthError> {
        AuthService::logout(self, refresh_token).await
    }

    async fn logout_all(&self, user_id: i64) -> Result<u64, AuthError> {
        AuthService::logout_all(self, user_id).await
    }

    async fn admin_reset_password(
        &self,
        actor: &SessionUser,
        target_user_id: i64,
        new_password: &str,
    ) -> Result<(), AuthError> {
        AuthService::admin_reset_password(self, actor, target_user_id, new_password).await
    }
}
