//! Order API Handlers
//!
//! Thin wrappers over [`OrderService`](crate::orders::OrderService); all rules
//! live in the service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::models::{AssignRequest, CreateOrderRequest, Order, OrderListQuery, UpdateStatusRequest};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, Json, ok, ok_with_message};

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<Order>>)> {
    let order = state.orders.create(&current, req).await?;
    Ok((StatusCode::CREATED, ok(order)))
}

/// GET /api/orders?status=
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.orders.list(&current, query.status).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    Ok(ok(state.orders.get(&current, &id).await?))
}

/// PATCH|PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.update_status(&current, &id, req.status).await?;
    Ok(ok(order))
}

/// POST|PUT|PATCH /api/orders/{id}/assign
pub async fn assign(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.assign(&current, &id, req.partner_id).await?;
    Ok(ok(order))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<String>>> {
    state.orders.delete(&current, &id).await?;
    Ok(ok_with_message(id, "Order deleted"))
}
