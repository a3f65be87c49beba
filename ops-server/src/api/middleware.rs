//! 请求日志中间件
//!
//! 记录所有进入的 HTTP 请求，包含用户信息、状态码和耗时

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::auth::CurrentUser;

/// 请求日志中间件
///
/// 记录请求结束时的：
/// - 请求 ID (x-request-id)
/// - HTTP 方法和路由模板
/// - 认证用户 (如果存在)
/// - 响应状态码和延迟 (毫秒)
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let method = req.method().clone();
    // 优先使用路由模板，避免订单号进入高基数字段
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map(|u| format!("{}({})", u.email, u.id));

    let response = next.run(req).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(%request_id, %method, %path, status, latency_ms, user = ?user, "Request failed with server error");
    } else if response.status().is_client_error() {
        warn!(%request_id, %method, %path, status, latency_ms, user = ?user, "Request rejected");
    } else {
        info!(%request_id, %method, %path, status, latency_ms, user = ?user, "Request completed");
    }

    response
}
