//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共)
//! - [`auth`] - 注册、登录、当前用户
//! - [`orders`] - 订单生命周期接口
//! - [`delivery_partners`] - 配送员列表、订单、统计、可用状态
//! - [`users`] - 账号启用/停用
//! - [`payments`] - 支付签名校验
//! - `/api/ws` - 实时订单事件 ([`crate::notify::ws`])

pub mod auth;
pub mod delivery_partners;
pub mod health;
pub mod middleware;
pub mod orders;
pub mod payments;
pub mod users;

use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::get;
use http::{HeaderName, HeaderValue};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::notify::ws;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - register/login public, me protected
        .merge(auth::router())
        .merge(orders::router())
        .merge(delivery_partners::router())
        .merge(users::router())
        .merge(payments::router())
        // WebSocket - authenticates via ?token= during the handshake
        .route("/api/ws", get(ws::handle_ws))
}

/// Build a fully configured application with all middleware
///
/// Used by the HTTP server and by integration tests (oneshot)
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // 请求超时 (408)
        .layer(TimeoutLayer::new(Duration::from_millis(
            state.config.request_timeout_ms,
        )))
        // JWT authentication - injects CurrentUser before routes run
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}
