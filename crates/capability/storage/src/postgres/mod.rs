//! # PostgreSQL 存储实现模块
//!
//! 生产环境使用的用户与 refresh token 台账存储。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 使用参数绑定
//! 2. **原子消费**：`take_refresh_token` 使用 `DELETE ... RETURNING`，
//!    同一 refresh token 的并发轮换只有一方成功
//! 3. **连接池管理**：由 `connect_pool` 创建，多个 store 共享同一个池
//!
//! ## 数据库模式要求
//!
//! 见 `migrations/0001_auth.sql`：
//! - `users`：id, email (unique), password_hash, role, first_name, last_name, school_id
//! - `refresh_tokens`：token (pk), user_id, token_type, expires_at（Unix 秒）

pub mod refresh_token;
pub mod user;

pub use refresh_token::*;
pub use user::*;
