//! Handlers 模块

pub mod auth;

pub use auth::*;
