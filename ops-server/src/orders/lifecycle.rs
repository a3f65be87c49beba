//! Order lifecycle state machine
//!
//! Status only moves forward along a fixed adjacency table:
//!
//! ```text
//! PENDING → PREPARING → READY_FOR_PICKUP → ASSIGNED → PICKED_UP → ON_ROUTE → DELIVERED
//!    └──→ CANCELLED
//! ```
//!
//! READY_FOR_PICKUP → ASSIGNED is owned by [`assignment`](super::assignment);
//! [`apply_transition`] refuses it.

use shared::OrderEvent;
use shared::models::{Order, OrderStatus};
use shared::util::MINUTE_MS;

use super::OrderError;
use super::validation::NewOrder;
use crate::auth::{Action, CurrentUser, can_perform};

/// Legal next statuses for `status`
pub fn allowed_next(status: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match status {
        Pending => &[Preparing, Cancelled],
        Preparing => &[ReadyForPickup],
        ReadyForPickup => &[Assigned],
        Assigned => &[PickedUp],
        PickedUp => &[OnRoute],
        OnRoute => &[Delivered],
        Delivered | Cancelled => &[],
    }
}

/// `base + prep_time + eta`, all in millis except the minute inputs
pub fn dispatch_time(base: i64, prep_time_minutes: i64, eta_minutes: i64) -> i64 {
    base + (prep_time_minutes + eta_minutes) * MINUTE_MS
}

/// Stamp a validated order with its id, timestamps and initial dispatch estimate
pub fn new_pending_order(id: String, new: NewOrder, now: i64, eta_minutes: i64) -> Order {
    Order {
        id,
        dispatch_time: Some(dispatch_time(now, new.prep_time, eta_minutes)),
        items: new.items,
        customer: new.customer,
        total_amount: new.total_amount,
        prep_time: new.prep_time,
        status: OrderStatus::Pending,
        assigned_partner: None,
        assigned_at: None,
        actual_delivery_time: None,
        created_at: now,
        updated_at: now,
    }
}

/// Move `order` to `requested` on behalf of `actor`.
///
/// The transition is checked before authorization. On error the order is
/// left untouched.
pub fn apply_transition(
    order: &mut Order,
    requested: OrderStatus,
    actor: &CurrentUser,
    now: i64,
) -> Result<OrderEvent, OrderError> {
    let from = order.status;
    if requested == OrderStatus::Assigned || !allowed_next(from).contains(&requested) {
        return Err(OrderError::InvalidTransition {
            from,
            to: requested,
        });
    }

    if !can_perform(actor, Action::AdvanceOrder(requested), Some(order)) {
        return Err(OrderError::Forbidden(format!(
            "{} may not move order {} to {requested}",
            actor.role, order.id
        )));
    }

    order.status = requested;
    order.updated_at = now;
    if requested == OrderStatus::Delivered {
        order.actual_delivery_time = Some(now);
    }
    debug_assert_eq!(
        order.assigned_partner.is_some(),
        order.status.requires_partner(),
        "order {} in {} with partner {:?}",
        order.id,
        order.status,
        order.assigned_partner
    );

    Ok(OrderEvent::status_updated(order))
}
