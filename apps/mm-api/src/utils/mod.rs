//! 工具模块：响应构造、Cookie 传输、输入校验。

pub mod cookies;
pub mod response;
pub mod validation;
