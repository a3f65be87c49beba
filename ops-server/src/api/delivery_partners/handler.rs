//! Delivery Partner Handlers

use axum::extract::{Path, State};
use shared::models::{AvailabilityUpdate, Order, PartnerStats, PartnerSummary, User};

use crate::auth::{Action, CurrentUser, can_perform};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::orders::PartnerOrderScope;
use crate::utils::{AppError, AppResponse, AppResult, Json, ok};

fn require(current: &CurrentUser, action: Action) -> AppResult<()> {
    if can_perform(current, action, None) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("{} may not {action:?}", current.role)))
    }
}

/// GET /api/delivery-partners
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<PartnerSummary>>>> {
    require(&current, Action::ListPartners)?;
    Ok(ok(user::list_partners(state.pool(), false).await?))
}

/// GET /api/delivery-partners/available
pub async fn list_available(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<PartnerSummary>>>> {
    require(&current, Action::ListPartners)?;
    Ok(ok(user::list_partners(state.pool(), true).await?))
}

async fn scoped_orders(
    state: &ServerState,
    current: &CurrentUser,
    partner_id: i64,
    scope: PartnerOrderScope,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state
        .orders
        .partner_orders(current, partner_id, scope)
        .await?;
    Ok(ok(orders))
}

/// GET /api/delivery-partners/{id}/orders
pub async fn orders(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    scoped_orders(&state, &current, id, PartnerOrderScope::All).await
}

/// GET /api/delivery-partners/{id}/active-orders
pub async fn active_orders(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    scoped_orders(&state, &current, id, PartnerOrderScope::Active).await
}

/// GET /api/delivery-partners/{id}/completed-orders
pub async fn completed_orders(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    scoped_orders(&state, &current, id, PartnerOrderScope::Completed).await
}

/// GET /api/delivery-partners/{id}/stats
pub async fn stats(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<PartnerStats>>> {
    Ok(ok(state.orders.partner_stats(&current, id).await?))
}

/// PATCH /api/delivery-partners/{id}/availability
///
/// Only the partner themselves may toggle availability.
pub async fn set_availability(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<AvailabilityUpdate>,
) -> AppResult<Json<AppResponse<User>>> {
    require(&current, Action::SetAvailability(id))?;
    let updated = user::set_availability(state.pool(), id, req.is_available).await?;
    tracing::info!(partner_id = id, is_available = req.is_available, "Partner availability changed");
    Ok(ok(updated))
}
