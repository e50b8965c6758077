//! 应用运行配置加载。
//!
//! 签名密钥只在进程启动时读取一次，随 `AppConfig` 显式传入 JWT 管理器。

use std::env;

/// 开发环境兜底密钥。只在非 production 下使用，启动时会打印告警。
const DEV_ACCESS_SECRET: &str = "mm-dev-access-secret-change-me";
const DEV_REFRESH_SECRET: &str = "mm-dev-refresh-secret-change-me";

const DEFAULT_ACCESS_TTL_SECONDS: u64 = 15 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_REFRESH_COOKIE_PATH: &str = "/auth/refresh";

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 运行环境。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub http_addr: String,
    pub database_url: Option<String>,
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub jwt_access_ttl_seconds: u64,
    pub jwt_refresh_ttl_seconds: u64,
    pub refresh_cookie_path: String,
    pub admin_reset_same_school: bool,
    /// 是否使用了开发兜底密钥（部署风险，需告警）。
    pub dev_secrets: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（测试可注入独立的密钥）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = match read("MM_ENV").as_deref().map(str::to_ascii_lowercase) {
            None => Environment::Development,
            Some(value) => match value.as_str() {
                "production" | "prod" => Environment::Production,
                "development" | "dev" | "test" => Environment::Development,
                _ => return Err(ConfigError::Invalid("MM_ENV".to_string(), value)),
            },
        };

        let access_secret = read("MM_JWT_ACCESS_SECRET");
        let refresh_secret = read("MM_JWT_REFRESH_SECRET");
        let mut dev_secrets = false;
        let (jwt_access_secret, jwt_refresh_secret) = match (access_secret, refresh_secret) {
            (Some(access), Some(refresh)) => (access, refresh),
            (None, _) if environment == Environment::Production => {
                return Err(ConfigError::Missing("MM_JWT_ACCESS_SECRET".to_string()));
            }
            (_, None) if environment == Environment::Production => {
                return Err(ConfigError::Missing("MM_JWT_REFRESH_SECRET".to_string()));
            }
            (access, refresh) => {
                dev_secrets = true;
                (
                    access.unwrap_or_else(|| DEV_ACCESS_SECRET.to_string()),
                    refresh.unwrap_or_else(|| DEV_REFRESH_SECRET.to_string()),
                )
            }
        };
        if jwt_access_secret == jwt_refresh_secret {
            return Err(ConfigError::Invalid(
                "MM_JWT_REFRESH_SECRET".to_string(),
                "must differ from MM_JWT_ACCESS_SECRET".to_string(),
            ));
        }

        let jwt_access_ttl_seconds = read_u64_with_default(
            read("MM_JWT_ACCESS_TTL_SECONDS"),
            "MM_JWT_ACCESS_TTL_SECONDS",
            DEFAULT_ACCESS_TTL_SECONDS,
        )?;
        let jwt_refresh_ttl_seconds = read_u64_with_default(
            read("MM_JWT_REFRESH_TTL_SECONDS"),
            "MM_JWT_REFRESH_TTL_SECONDS",
            DEFAULT_REFRESH_TTL_SECONDS,
        )?;

        let refresh_cookie_path = read("MM_REFRESH_COOKIE_PATH")
            .unwrap_or_else(|| DEFAULT_REFRESH_COOKIE_PATH.to_string());
        if !refresh_cookie_path.starts_with('/') {
            return Err(ConfigError::Invalid(
                "MM_REFRESH_COOKIE_PATH".to_string(),
                refresh_cookie_path,
            ));
        }

        Ok(Self {
            environment,
            http_addr: read("MM_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:5000".to_string()),
            database_url: read("MM_DATABASE_URL"),
            jwt_access_secret,
            jwt_refresh_secret,
            jwt_access_ttl_seconds,
            jwt_refresh_ttl_seconds,
            refresh_cookie_path,
            admin_reset_same_school: read_bool_with_default(
                read("MM_ADMIN_RESET_SAME_SCHOOL"),
                true,
            ),
            dev_secrets,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Cookie 是否带 Secure（仅 production）。
    pub fn secure_cookies(&self) -> bool {
        self.is_production()
    }
}

fn read_u64_with_default(value: Option<String>, key: &str, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_bool_with_default(value: Option<String>, default: bool) -> bool {
    match value {
        Some(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        None => default,
    }
}
