//! Delivery Partner API Module
//!
//! | 路径 | 方法 | 角色 |
//! |------|------|------|
//! | /api/delivery-partners | GET | 经理 |
//! | /api/delivery-partners/available | GET | 经理 |
//! | /api/delivery-partners/{id}/orders | GET | 经理 / 本人 |
//! | /api/delivery-partners/{id}/active-orders | GET | 经理 / 本人 |
//! | /api/delivery-partners/{id}/completed-orders | GET | 经理 / 本人 |
//! | /api/delivery-partners/{id}/stats | GET | 经理 / 本人 |
//! | /api/delivery-partners/{id}/availability | PATCH | 本人 |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/delivery-partners", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/available", get(handler::list_available))
        .route("/{id}/orders", get(handler::orders))
        .route("/{id}/active-orders", get(handler::active_orders))
        .route("/{id}/completed-orders", get(handler::completed_orders))
        .route("/{id}/stats", get(handler::stats))
        .route("/{id}/availability", patch(handler::set_availability))
}
