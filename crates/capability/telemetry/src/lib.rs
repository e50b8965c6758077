//! 追踪初始化与请求 ID 生成。

use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 初始化 tracing（`RUST_LOG` 优先，默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
///
/// 客户端传入的 `x-request-id` 只作为 request_id 复用，trace_id 始终由服务端生成。
pub fn new_request_ids(incoming_request_id: Option<&str>) -> RequestIds {
    let request_id = incoming_request_id
        .map(str::trim)
        .filter(|value| !value.is_empty() && value.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    RequestIds {
        request_id,
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}
