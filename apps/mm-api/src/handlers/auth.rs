//! 认证相关 handlers：注册、登录、登出、刷新、当前身份、管理员重置口令
//!
//! ## 提供的端点
//!
//! ### 公开端点（无需认证）
//! - `GET /health`, `GET /livez`, `GET /readyz` - 探针
//! - `POST /auth/register` - 注册，201 + 身份，写入两个 Cookie
//! - `POST /auth/login` - 登录，200 + 身份，写入两个 Cookie
//! - `POST /auth/refresh` - 凭 refresh cookie 轮换 token 对
//!
//! ### 会话端点（需 access cookie）
//! - `POST /auth/logout` - 登出当前设备，清除两个 Cookie
//! - `POST /auth/logout-all` - 登出全部设备
//! - `GET /auth/user` - 当前身份
//!
//! ### 管理员端点（会话 + admin 角色）
//! - `POST /auth/admin-reset-password` - 重置他人口令
//!
//! ## Token 刷新流程
//! 1. 客户端 access token 过期，受保护端点返回 401
//! 2. 客户端调用 `/auth/refresh`，浏览器仅向该路径发送 refresh cookie
//! 3. 服务端原子移除旧台账记录，签发新 token 对并写入新 Cookie
//! 4. 旧 refresh token 永久失效

use crate::AppState;
use crate::utils::cookies::refresh_token as refresh_cookie;
use crate::utils::response::{auth_error, auth_failure, bad_request_error, session_to_dto, user_to_dto};
use crate::utils::validation::{normalize_optional, normalize_required, parse_role, require_present};
use api_contract::{AdminResetPasswordRequest, ApiResponse, LoginRequest, MessageResponse, RegisterRequest};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use domain::SessionUser;
use mm_auth::Registration;

/// 健康检查端点
pub async fn health() -> impl IntoResponse {
    livez().await
}

/// Liveness 探针：只反映进程存活，不做外部依赖检查。
pub async fn livez() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Readiness 探针：配置了数据库时检查 Postgres 连接。
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response();
    };

    match sqlx::query_scalar::<_, i32>("select 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readyz check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "ok": false })),
            )
                .into_response()
        }
    }
}

/// 注册接口
///
/// # Errors
///
/// - `400 BAD REQUEST`: 字段缺失、口令过短、角色无法识别
/// - `409 CONFLICT`: email/用户名已存在（不写入任何记录）
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request_error(rejection.body_text()),
    };
    let registration = match build_registration(req) {
        Ok(registration) => registration,
        Err(response) => return response,
    };

    match state.auth.register(registration).await {
        Ok((user, tokens)) => {
            let jar = state.cookies.set_session(jar, &tokens);
            (
                StatusCode::CREATED,
                jar,
                Json(ApiResponse::success(user_to_dto(&user))),
            )
                .into_response()
        }
        Err(err) => auth_failure(err),
    }
}

fn build_registration(req: RegisterRequest) -> Result<Registration, Response> {
    Ok(Registration {
        email: normalize_required(req.email, "email")?,
        password: require_present(req.password, "password")?,
        role: parse_role(req.role)?,
        first_name: normalize_optional(req.first_name, "firstName")?,
        last_name: normalize_optional(req.last_name, "lastName")?,
        school_id: req.school_id,
    })
}

/// 登录接口
///
/// 身份不存在与口令错误返回同一个 401（`AUTH.INVALID_CREDENTIALS`）。
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request_error(rejection.body_text()),
    };
    let email = match normalize_required(req.email, "email") {
        Ok(email) => email,
        Err(response) => return response,
    };
    let password = match require_present(req.password, "password") {
        Ok(password) => password,
        Err(response) => return response,
    };

    match state.auth.login(&email, &password).await {
        Ok((user, tokens)) => {
            let jar = state.cookies.set_session(jar, &tokens);
            (
                StatusCode::OK,
                jar,
                Json(ApiResponse::success(user_to_dto(&user))),
            )
                .into_response()
        }
        Err(err) => auth_failure(err),
    }
}

/// 登出接口
///
/// 带了 refresh cookie 则从台账移除；无论如何都清除两个 Cookie。幂等。
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = refresh_cookie(&jar);
    if let Err(err) = state.auth.logout(token.as_deref()).await {
        return auth_failure(err);
    }
    let jar = state.cookies.clear_session(jar);
    (
        StatusCode::OK,
        jar,
        Json(ApiResponse::success(MessageResponse::new("logged out"))),
    )
        .into_response()
}

/// 登出全部设备
pub async fn logout_all(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    jar: CookieJar,
) -> Response {
    if let Err(err) = state.auth.logout_all(session.user_id).await {
        return auth_failure(err);
    }
    let jar = state.cookies.clear_session(jar);
    (
        StatusCode::OK,
        jar,
        Json(ApiResponse::success(MessageResponse::new("logged out everywhere"))),
    )
        .into_response()
}

/// 刷新 token 对（轮换）
///
/// # Errors
///
/// - `401 UNAUTHORIZED`: 无 refresh cookie、台账无记录或已过期、JWT 无效、身份不存在
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(token) = refresh_cookie(&jar) else {
        return auth_error(StatusCode::UNAUTHORIZED);
    };
    match state.auth.refresh(&token).await {
        Ok((user, tokens)) => {
            let jar = state.cookies.set_session(jar, &tokens);
            (
                StatusCode::OK,
                jar,
                Json(ApiResponse::success(user_to_dto(&user))),
            )
                .into_response()
        }
        Err(err) => auth_failure(err),
    }
}

/// 当前身份
pub async fn current_user(Extension(session): Extension<SessionUser>) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(session_to_dto(&session)))).into_response()
}

/// 管理员重置口令
///
/// 可配置为仅限本校目标；越界返回 403 且口令哈希不变。已有会话不失效。
pub async fn admin_reset_password(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    payload: Result<Json<AdminResetPasswordRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request_error(rejection.body_text()),
    };
    match state
        .auth
        .admin_reset_password(&session, req.target_user_id, &req.new_password)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(MessageResponse::new("password reset"))),
        )
            .into_response(),
        Err(err) => auth_failure(err),
    }
}
