//! Cookie 传输：把 token 对写入 HttpOnly Cookie，并按 token 类别区分路径与有效期。
//!
//! - access cookie：路径 `/`，Max-Age = access token 有效期
//! - refresh cookie：路径 = 刷新端点，Max-Age = refresh token 有效期
//!
//! 两者均为 `SameSite=Strict`，production 下带 `Secure`。清除时使用与写入相同的路径。

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use mm_auth::AuthTokens;
use mm_config::AppConfig;
use time::Duration;

/// access token 的 Cookie 名。
pub const ACCESS_COOKIE: &str = "mm_access";
/// refresh token 的 Cookie 名。
pub const REFRESH_COOKIE: &str = "mm_refresh";

/// Cookie 写入策略。
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    secure: bool,
    refresh_path: String,
    access_max_age_seconds: u64,
    refresh_max_age_seconds: u64,
}

impl CookiePolicy {
    pub fn new(
        secure: bool,
        refresh_path: impl Into<String>,
        access_max_age_seconds: u64,
        refresh_max_age_seconds: u64,
    ) -> Self {
        Self {
            secure,
            refresh_path: refresh_path.into(),
            access_max_age_seconds,
            refresh_max_age_seconds,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.secure_cookies(),
            config.refresh_cookie_path.clone(),
            config.jwt_access_ttl_seconds,
            config.jwt_refresh_ttl_seconds,
        )
    }

    /// 写入 access/refresh 两个 Cookie。
    pub fn set_session(&self, jar: CookieJar, tokens: &AuthTokens) -> CookieJar {
        jar.add(self.build(
            ACCESS_COOKIE,
            tokens.access_token.clone(),
            "/".to_string(),
            seconds(self.access_max_age_seconds),
        ))
        .add(self.build(
            REFRESH_COOKIE,
            tokens.refresh_token.clone(),
            self.refresh_path.clone(),
            seconds(self.refresh_max_age_seconds),
        ))
    }

    /// 清除两个 Cookie（空值 + Max-Age=0）。
    pub fn clear_session(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.build(ACCESS_COOKIE, String::new(), "/".to_string(), Duration::ZERO))
            .add(self.build(
                REFRESH_COOKIE,
                String::new(),
                self.refresh_path.clone(),
                Duration::ZERO,
            ))
    }

    fn build(
        &self,
        name: &'static str,
        value: String,
        path: String,
        max_age: Duration,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .path(path)
            .max_age(max_age)
            .build()
    }
}

/// 从请求 Cookie 中读取 access token。
pub fn access_token(jar: &CookieJar) -> Option<String> {
    cookie_value(jar, ACCESS_COOKIE)
}

/// 从请求 Cookie 中读取 refresh token。
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    cookie_value(jar, REFRESH_COOKIE)
}

fn cookie_value(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn seconds(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    fn tokens() -> AuthTokens {
        AuthTokens {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            access_expires_at: 0,
            refresh_expires_at: 0,
        }
    }

    #[test]
    fn session_cookies_are_scoped_per_token_class() {
        let policy = CookiePolicy::new(false, "/auth/refresh", 900, 604800);
        let jar = policy.set_session(CookieJar::new(), &tokens());

        let access = jar.get(ACCESS_COOKIE).expect("access cookie");
        assert_eq!(access.value(), "access-1");
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Strict));
        assert_eq!(access.max_age(), Some(Duration::seconds(900)));
        assert_eq!(access.secure(), Some(false));

        let refresh = jar.get(REFRESH_COOKIE).expect("refresh cookie");
        assert_eq!(refresh.path(), Some("/auth/refresh"));
        assert_eq!(refresh.max_age(), Some(Duration::seconds(604800)));
    }

    #[test]
    fn production_cookies_are_secure() {
        let policy = CookiePolicy::new(true, "/auth/refresh", 900, 604800);
        let jar = policy.set_session(CookieJar::new(), &tokens());
        assert_eq!(jar.get(ACCESS_COOKIE).and_then(|c| c.secure()), Some(true));
        assert_eq!(jar.get(REFRESH_COOKIE).and_then(|c| c.secure()), Some(true));
    }

    #[test]
    fn cleared_cookies_keep_their_paths() {
        let policy = CookiePolicy::new(false, "/auth/refresh", 900, 604800);
        let jar = policy.clear_session(CookieJar::new());
        let refresh = jar.get(REFRESH_COOKIE).expect("refresh cookie");
        assert_eq!(refresh.value(), "");
        assert_eq!(refresh.path(), Some("/auth/refresh"));
        assert_eq!(refresh.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn tokens_read_from_request_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; mm_access=abc; mm_refresh="),
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(access_token(&jar).as_deref(), Some("abc"));
        assert_eq!(refresh_token(&jar), None);
    }
}
