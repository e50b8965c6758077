use crate::AuthError;
use argon2::{
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    password_hash::SaltString,
};
use rand_core::OsRng;
use std::sync::LazyLock;

/// 身份不存在时用于校验的占位哈希，参数与真实哈希一致，保证两条路径耗时相当。
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("mm-dummy-password-for-unknown-identity").ok());

/// 使用 Argon2id 与随机盐生成口令哈希（PHC 字符串）。
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Internal(err.to_string()))?;
    Ok(hash.to_string())
}

/// 校验口令。任何不匹配（含无法解析的存储哈希）都返回 false，不返回错误。
pub fn verify_password(stored_password_hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// 对占位哈希执行一次完整校验并丢弃结果（身份不存在时调用）。
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_PASSWORD_HASH.as_deref() {
        let _ = verify_password(hash, password);
    }
}
