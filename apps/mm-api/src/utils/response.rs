//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, invalid_credentials_error, forbidden_error, conflict_error,
//!   bad_request_error, not_found_error, internal_error, auth_failure
//! - DTO 转换：user_to_dto, session_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - HTTP 状态码与错误码对应
//! - 内部错误细节只写日志，不返回客户端

use api_contract::{ApiResponse, UserDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::SessionUser;
use mm_auth::AuthError;
use mm_storage::UserRecord;

/// 认证错误响应（泛化，不区分原因）
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 凭据错误响应：身份不存在与口令错误共用
pub fn invalid_credentials_error() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(
            "AUTH.INVALID_CREDENTIALS",
            "invalid credentials",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error(message: impl Into<String>) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", message.into())),
    )
        .into_response()
}

/// 冲突错误响应
pub fn conflict_error() -> Response {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::<()>::error("AUTH.CONFLICT", "user already exists")),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 内部错误响应
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", "internal error")),
    )
        .into_response()
}

/// AuthError 到 HTTP 响应的统一映射
pub fn auth_failure(err: AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => invalid_credentials_error(),
        AuthError::TokenInvalid => auth_error(StatusCode::UNAUTHORIZED),
        AuthError::Forbidden(message) => forbidden_error(message),
        AuthError::Conflict => conflict_error(),
        AuthError::Validation(message) => bad_request_error(message),
        AuthError::NotFound => not_found_error(),
        AuthError::Internal(message) => {
            tracing::error!(error = %message, "auth internal error");
            internal_error()
        }
    }
}

/// UserRecord 转 UserDto（丢弃口令哈希）
pub fn user_to_dto(record: &UserRecord) -> UserDto {
    session_to_dto(&record.to_session_user())
}

/// SessionUser 转 UserDto
pub fn session_to_dto(session: &SessionUser) -> UserDto {
    UserDto {
        id: session.user_id,
        email: session.email.clone(),
        role: session.role.to_string(),
        first_name: session.first_name.clone(),
        last_name: session.last_name.clone(),
        display_name: session.display_name(),
        school_id: session.school_id,
    }
}
