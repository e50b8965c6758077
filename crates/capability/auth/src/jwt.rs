use crate::{AuthError, AuthTokens};
use domain::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

// 区分 access 与 refresh 的 token 类型。
const ACCESS_TOKEN_TYPE: &str = "access";
const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
/// JWT 内部 claims。
struct Claims {
    sub: String,
    email: String,
    role: String,
    iat: u64,
    exp: u64,
    token_type: String,
    jti: Option<String>,
}

/// token 载荷：身份 id、email/用户名、角色。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

/// 两个签名域的密钥对。access 与 refresh 永不共用。
struct SigningDomain {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u64,
    token_type: &'static str,
}

impl SigningDomain {
    fn new(secret: &[u8], ttl_seconds: u64, token_type: &'static str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_seconds,
            token_type,
        }
    }
}

/// JWT 签发与校验。
pub struct JwtManager {
    access: SigningDomain,
    refresh: SigningDomain,
}

impl JwtManager {
    /// 创建 JWT 管理器；两个密钥来自启动时构造的配置对象。
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl_seconds: u64,
        refresh_ttl_seconds: u64,
    ) -> Self {
        Self {
            access: SigningDomain::new(
                access_secret.as_bytes(),
                access_ttl_seconds,
                ACCESS_TOKEN_TYPE,
            ),
            refresh: SigningDomain::new(
                refresh_secret.as_bytes(),
                refresh_ttl_seconds,
                REFRESH_TOKEN_TYPE,
            ),
        }
    }

    pub fn access_ttl_seconds(&self) -> u64 {
        self.access.ttl_seconds
    }

    pub fn refresh_ttl_seconds(&self) -> u64 {
        self.refresh.ttl_seconds
    }

    /// 基于同一载荷签发 access/refresh token 对。
    ///
    /// refresh token 带随机 jti，同一秒内多次签发也不会得到相同的 token。
    pub fn issue_tokens(&self, payload: &TokenPayload) -> Result<AuthTokens, AuthError> {
        let now = now_epoch_seconds();
        let access_token = self.encode(&self.access, payload, now, None)?;
        let refresh_token = self.encode(
            &self.refresh,
            payload,
            now,
            Some(Uuid::new_v4().to_string()),
        )?;
        Ok(AuthTokens {
            access_token,
            refresh_token,
            access_expires_at: now.saturating_add(self.access.ttl_seconds),
            refresh_expires_at: now.saturating_add(self.refresh.ttl_seconds),
        })
    }

    /// 解析 access token；签名、格式、过期任一失败都返回 None。
    pub fn decode_access(&self, token: &str) -> Option<TokenPayload> {
        decode(&self.access, token)
    }

    /// 解析 refresh token；语义同 `decode_access`，使用 refresh 密钥。
    pub fn decode_refresh(&self, token: &str) -> Option<TokenPayload> {
        decode(&self.refresh, token)
    }

    fn encode(
        &self,
        domain: &SigningDomain,
        payload: &TokenPayload,
        now: u64,
        jti: Option<String>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: payload.user_id.to_string(),
            email: payload.email.clone(),
            role: payload.role.as_str().to_string(),
            iat: now,
            exp: now.saturating_add(domain.ttl_seconds),
            token_type: domain.token_type.to_string(),
            jti,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &domain.encoding)
            .map_err(|err| AuthError::Internal(err.to_string()))
    }
}

fn decode(domain: &SigningDomain, token: &str) -> Option<TokenPayload> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    let claims = jsonwebtoken::decode::<Claims>(token, &domain.decoding, &validation)
        .ok()?
        .claims;
    if claims.token_type != domain.token_type {
        return None;
    }
    Some(TokenPayload {
        user_id: claims.sub.parse().ok()?,
        email: claims.email,
        role: claims.role.parse().ok()?,
    })
}

/// 当前时间戳（秒）。
pub(crate) fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
