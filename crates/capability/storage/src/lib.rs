//! # MasteryMap Storage 模块
//!
//! 认证核心消费的凭据存储：用户记录与 refresh token 台账。
//!
//! ## 模块说明
//!
//! - [`models`]：UserRecord、NewUser、RefreshTokenRecord
//! - [`traits`]：UserStore、RefreshTokenStore 异步接口
//! - [`error`]：StorageError（带唯一键冲突标记）
//! - [`connection`]：PostgreSQL 连接池
//! - [`in_memory`]：`RwLock<HashMap>` 实现，用于测试和无数据库的本地开发
//! - [`postgres`]：sqlx 实现，生产环境使用
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use mm_storage::{InMemoryUserStore, UserStore};
//!
//! let store = InMemoryUserStore::new();
//! let user = store.find_by_email("a@x.com").await?;
//! ```

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use traits::*;

pub use in_memory::{InMemoryRefreshTokenStore, InMemoryUserStore};
pub use postgres::{PgRefreshTokenStore, PgUserStore};
