//! Order API Module
//!
//! | 路径 | 方法 | 角色 |
//! |------|------|------|
//! | /api/orders | POST | 经理 |
//! | /api/orders | GET | 经理 (全部) / 配送员 (本人) |
//! | /api/orders/{id} | GET | 经理 / 已分配的配送员 |
//! | /api/orders/{id} | DELETE | 经理，仅 DELIVERED |
//! | /api/orders/{id}/status | PATCH, PUT | 按状态流转规则 |
//! | /api/orders/{id}/assign | POST, PUT, PATCH | 经理 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route(
            "/{id}/status",
            patch(handler::update_status).put(handler::update_status),
        )
        .route(
            "/{id}/assign",
            post(handler::assign)
                .put(handler::assign)
                .patch(handler::assign),
        )
}
