//! 输入验证辅助函数
//!
//! - normalize_required：验证必填字段，去除空格并检查非空
//! - normalize_optional：验证可选字段，如果提供则去除空格并检查非空
//! - require_present：口令等不裁剪的必填字段
//! - parse_role：解析注册角色，缺省为 student
//!
//! 失败统一返回 bad_request_error 响应。

use crate::utils::response::bad_request_error;
use axum::response::Response;
use domain::Role;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: String, field: &str) -> Result<String, Response> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字段，如果提供则去除空格并检查非空
pub fn normalize_optional(value: Option<String>, field: &str) -> Result<Option<String>, Response> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(bad_request_error(format!("{field} required")));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}

/// 验证必填但保留原样的字段（口令中的空格有意义）
pub fn require_present(value: String, field: &str) -> Result<String, Response> {
    if value.trim().is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(value)
}

/// 解析角色，缺省为 student
pub fn parse_role(value: Option<String>) -> Result<Role, Response> {
    match value {
        Some(value) => value
            .parse::<Role>()
            .map_err(|err| bad_request_error(err.to_string())),
        None => Ok(Role::Student),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(
            normalize_required("  a@x.com ".to_string(), "email").ok(),
            Some("a@x.com".to_string())
        );
        assert!(normalize_required("   ".to_string(), "email").is_err());
    }

    #[test]
    fn optional_fields_reject_blank() {
        assert_eq!(normalize_optional(None, "firstName").ok(), Some(None));
        assert!(normalize_optional(Some(" ".to_string()), "firstName").is_err());
    }

    #[test]
    fn role_defaults_to_student() {
        assert_eq!(parse_role(None).ok(), Some(Role::Student));
        assert_eq!(parse_role(Some("Teacher".to_string())).ok(), Some(Role::Teacher));
        assert!(parse_role(Some("principal".to_string())).is_err());
    }
}
