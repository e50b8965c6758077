//! 认证和授权中间件
//!
//! 提供以下中间件和辅助函数：
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - require_session：校验 access cookie 并加载会话上下文
//! - session_gate：会话门禁，把 SessionUser 写入请求扩展
//! - RoleGate / role_gate：角色门禁，作用于已认证的会话
//!
//! 认证流程：
//! 1. request_context：在所有请求前注入追踪 ID
//! 2. session_gate：无 Cookie、token 无效/过期、身份不存在一律 401
//! 3. role_gate：无会话 401，角色不符 403
//! 4. handler 通过 `Extension<SessionUser>` 读取会话

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use domain::{Role, SessionUser};
use mm_auth::AuthError;
use mm_telemetry::new_request_ids;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::cookies::access_token;
use crate::utils::response::{auth_error, auth_failure, forbidden_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let incoming = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok());
    let ids = new_request_ids(incoming);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 校验 access cookie 并提取会话上下文
pub async fn require_session(state: &AppState, jar: &CookieJar) -> Result<SessionUser, Response> {
    let Some(token) = access_token(jar) else {
        return Err(auth_error(StatusCode::UNAUTHORIZED));
    };
    match state.auth.authenticate(&token).await {
        Ok(session) => Ok(session),
        Err(AuthError::TokenInvalid) => Err(auth_error(StatusCode::UNAUTHORIZED)),
        Err(err) => Err(auth_failure(err)),
    }
}

/// 会话门禁中间件
pub async fn session_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let session = match require_session(&state, &jar).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    req.extensions_mut().insert(session);
    next.run(req).await
}

/// 角色门禁：允许的角色集合 + 拒绝时的提示信息
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    allowed: &'static [Role],
    message: &'static str,
}

impl RoleGate {
    /// 仅管理员
    pub const ADMIN: RoleGate = RoleGate::new(&[Role::Admin], "admin access required");

    pub const fn new(allowed: &'static [Role], message: &'static str) -> Self {
        Self { allowed, message }
    }

    /// 无会话视为未认证（401），角色不符为 403。
    pub fn check(&self, session: Option<&SessionUser>) -> Result<(), Response> {
        let Some(session) = session else {
            return Err(auth_error(StatusCode::UNAUTHORIZED));
        };
        if session.has_any_role(self.allowed) {
            Ok(())
        } else {
            tracing::info!(
                user_id = session.user_id,
                role = %session.role,
                "role gate rejected"
            );
            Err(forbidden_error(self.message))
        }
    }
}

/// 角色门禁中间件；需挂在 session_gate 之后
pub async fn role_gate(State(gate): State<RoleGate>, req: Request, next: Next) -> Response {
    if let Err(response) = gate.check(req.extensions().get::<SessionUser>()) {
        return response;
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::RoleGate;
    use axum::http::StatusCode;
    use domain::{Role, SessionUser};

    fn session(role: Role) -> SessionUser {
        SessionUser {
            user_id: 1,
            email: "u@x.com".to_string(),
            role,
            first_name: None,
            last_name: None,
            school_id: None,
        }
    }

    #[test]
    fn missing_session_is_unauthorized() {
        let response = RoleGate::ADMIN.check(None).expect_err("no session");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let response = RoleGate::ADMIN
            .check(Some(&session(Role::Teacher)))
            .expect_err("teacher");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn permitted_roles_pass() {
        assert!(RoleGate::ADMIN.check(Some(&session(Role::Admin))).is_ok());

        let staff = RoleGate::new(&[Role::Teacher, Role::Admin], "teacher access required");
        assert!(staff.check(Some(&session(Role::Teacher))).is_ok());
        assert!(staff.check(Some(&session(Role::Student))).is_err());
    }
}
