//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由按门禁分三组：
//! - 公开：/health, /livez, /readyz, /auth/register, /auth/login, /auth/refresh
//! - 会话：/auth/logout, /auth/logout-all, /auth/user
//! - 会话 + admin：/auth/admin-reset-password

use super::AppState;
use super::handlers::*;
use super::middleware::{RoleGate, role_gate, session_gate};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

/// 创建 API 路由
///
/// 会话门禁在外层，角色门禁在内层，因此角色检查总是看到已解析的会话。
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/auth/admin-reset-password", post(admin_reset_password))
        .route_layer(from_fn_with_state(RoleGate::ADMIN, role_gate));

    let session = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/logout-all", post(logout_all))
        .route("/auth/user", get(current_user))
        .merge(admin)
        .route_layer(from_fn_with_state(state, session_gate));

    Router::new()
        .route("/health", get(health))
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .merge(session)
}
