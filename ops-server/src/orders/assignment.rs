//! Delivery partner assignment
//!
//! The manager names the partner; there is no automatic scheduling. The
//! capacity check reads the active count before the write, so concurrent
//! assignments to different orders can overshoot the cap.

use shared::OrderEvent;
use shared::models::{Order, OrderStatus, Role, User};

use super::OrderError;
use super::lifecycle::dispatch_time;
use crate::auth::{Action, CurrentUser, can_perform};

/// Maximum ASSIGNED / PICKED_UP / ON_ROUTE orders per partner
pub const MAX_ACTIVE_ORDERS: i64 = 3;

/// Assign `partner` to `order`.
///
/// Checks run in order: role, partner, existing assignment, status, capacity.
/// `partner` is `None` when no such user exists. On success the order moves to
/// ASSIGNED and its dispatch estimate is recomputed from `now`.
pub fn assign(
    order: &mut Order,
    partner: Option<&User>,
    active_count: i64,
    actor: &CurrentUser,
    now: i64,
    eta_minutes: i64,
) -> Result<OrderEvent, OrderError> {
    if !can_perform(actor, Action::AssignOrder, Some(order)) {
        return Err(OrderError::Forbidden(
            "Only restaurant managers can assign orders".into(),
        ));
    }

    let partner = partner
        .filter(|p| p.role == Role::DeliveryPartner && p.is_active)
        .ok_or_else(|| OrderError::NotFound("Delivery partner not found".into()))?;

    if order.assigned_partner.is_some() {
        return Err(OrderError::AlreadyAssigned(order.id.clone()));
    }

    if order.status != OrderStatus::ReadyForPickup {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Assigned,
        });
    }

    if active_count >= MAX_ACTIVE_ORDERS {
        return Err(OrderError::CapacityExceeded {
            partner_id: partner.id,
            active: active_count,
        });
    }

    order.status = OrderStatus::Assigned;
    order.assigned_partner = Some(partner.id);
    order.assigned_at = Some(now);
    order.dispatch_time = Some(dispatch_time(now, order.prep_time, eta_minutes));
    order.updated_at = now;
    debug_assert!(order.status.requires_partner());

    Ok(OrderEvent::assigned(order))
}
