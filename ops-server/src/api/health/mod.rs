//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/health | GET | 存活检查 + 数据库 ping | 无 |
//!
//! # 响应示例
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "database": "ok", "subscribers": 2 }
//! ```

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::notify::Partition;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | degraded)
    status: &'static str,
    version: &'static str,
    /// 数据库连通性 (ok | error)
    database: &'static str,
    /// 当前实时订阅数 (经理 + 配送员)
    subscribers: usize,
}

/// GET /api/health
///
/// 数据库不可用时返回 503
pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.pool())
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "Health check database ping failed");
            false
        }
    };

    let subscribers = state.hub.subscriber_count(Partition::Restaurant)
        + state.hub.subscriber_count(Partition::Delivery);

    let (status, code) = if db_ok {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: if db_ok { "ok" } else { "error" },
            subscribers,
        }),
    )
}
