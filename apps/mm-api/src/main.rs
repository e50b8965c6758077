//! MasteryMap 认证 API：注册/登录/登出/刷新、当前身份与管理员重置口令。

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::Router;
use mm_auth::{AuthService, Authenticator, JwtManager};
use mm_config::AppConfig;
use mm_storage::{
    InMemoryRefreshTokenStore, InMemoryUserStore, PgRefreshTokenStore, PgUserStore,
    RefreshTokenStore, UserStore, connect_pool,
};
use mm_telemetry::init_tracing;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utils::cookies::CookiePolicy;

/// 应用共享状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn Authenticator>,
    pub cookies: CookiePolicy,
    pub db_pool: Option<PgPool>,
}

/// 组装完整应用：路由 + HTTP 追踪 + 请求上下文。
pub fn build_app(state: AppState) -> Router {
    routes::create_api_router(state.clone())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(axum::middleware::from_fn(middleware::request_context))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();
    if config.dev_secrets {
        tracing::warn!("using built-in development JWT secrets; set MM_JWT_ACCESS_SECRET and MM_JWT_REFRESH_SECRET before deploying");
    }

    // 配置了数据库则使用 Postgres（需先执行 migrations），否则使用内存存储
    let user_store: Arc<dyn UserStore>;
    let refresh_store: Arc<dyn RefreshTokenStore>;
    let db_pool = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = connect_pool(database_url).await?;
            user_store = Arc::new(PgUserStore::new(pool.clone()));
            refresh_store = Arc::new(PgRefreshTokenStore::new(pool.clone()));
            Some(pool)
        }
        None => {
            tracing::warn!("MM_DATABASE_URL not set; using in-memory credential store");
            user_store = Arc::new(InMemoryUserStore::new());
            refresh_store = Arc::new(InMemoryRefreshTokenStore::new());
            None
        }
    };

    // JWT 管理器：两个签名域，密钥只在此处从配置对象传入
    let jwt = JwtManager::new(
        &config.jwt_access_secret,
        &config.jwt_refresh_secret,
        config.jwt_access_ttl_seconds,
        config.jwt_refresh_ttl_seconds,
    );
    let auth = AuthService::new(user_store, refresh_store, jwt)
        .with_school_scoped_admin_reset(config.admin_reset_same_school);
    let state = AppState {
        auth: Arc::new(auth),
        cookies: CookiePolicy::from_config(&config),
        db_pool,
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "mm-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
