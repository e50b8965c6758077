use mm_config::{AppConfig, ConfigError, Environment};
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("MM_JWT_ACCESS_SECRET", "access-secret");
        std::env::set_var("MM_JWT_REFRESH_SECRET", "refresh-secret");
        std::env::set_var("MM_JWT_ACCESS_TTL_SECONDS", "600");
        std::env::set_var("MM_HTTP_ADDR", "127.0.0.1:8081");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.jwt_access_ttl_seconds, 600);
    assert_eq!(config.jwt_access_secret, "access-secret");
    assert!(!config.dev_secrets);
}

#[test]
fn defaults_apply_in_development() {
    let config = AppConfig::from_lookup(lookup(&[])).expect("config");
    assert_eq!(config.environment, Environment::Development);
    assert!(config.dev_secrets);
    assert_ne!(config.jwt_access_secret, config.jwt_refresh_secret);
    assert_eq!(config.jwt_access_ttl_seconds, 15 * 60);
    assert_eq!(config.jwt_refresh_ttl_seconds, 7 * 24 * 60 * 60);
    assert_eq!(config.refresh_cookie_path, "/auth/refresh");
    assert!(config.admin_reset_same_school);
    assert!(config.database_url.is_none());
    assert!(!config.secure_cookies());
}

#[test]
fn production_requires_both_secrets() {
    let err = AppConfig::from_lookup(lookup(&[
        ("MM_ENV", "production"),
        ("MM_JWT_ACCESS_SECRET", "a"),
    ]))
    .expect_err("missing refresh secret");
    assert!(matches!(err, ConfigError::Missing(key) if key == "MM_JWT_REFRESH_SECRET"));

    let config = AppConfig::from_lookup(lookup(&[
        ("MM_ENV", "production"),
        ("MM_JWT_ACCESS_SECRET", "a"),
        ("MM_JWT_REFRESH_SECRET", "b"),
    ]))
    .expect("config");
    assert!(config.secure_cookies());
    assert!(!config.dev_secrets);
}

#[test]
fn identical_secrets_rejected() {
    let err = AppConfig::from_lookup(lookup(&[
        ("MM_JWT_ACCESS_SECRET", "same"),
        ("MM_JWT_REFRESH_SECRET", "same"),
    ]))
    .expect_err("same secrets");
    assert!(matches!(err, ConfigError::Invalid(..)));
}

#[test]
fn invalid_values_rejected() {
    assert!(AppConfig::from_lookup(lookup(&[("MM_JWT_ACCESS_TTL_SECONDS", "soon")])).is_err());
    assert!(AppConfig::from_lookup(lookup(&[("MM_ENV", "staging")])).is_err());
    assert!(AppConfig::from_lookup(lookup(&[("MM_REFRESH_COOKIE_PATH", "auth")])).is_err());

    let config = AppConfig::from_lookup(lookup(&[("MM_ADMIN_RESET_SAME_SCHOOL", "false")]))
        .expect("config");
    assert!(!config.admin_reset_same_school);
}
