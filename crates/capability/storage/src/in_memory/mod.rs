//! 内存存储实现模块
//!
//! 用于本地开发（未配置数据库时）和测试。
//!
//! - UserStore: InMemoryUserStore
//! - RefreshTokenStore: InMemoryRefreshTokenStore

pub mod refresh_token;
pub mod user;

pub use refresh_token::*;
pub use user::*;
