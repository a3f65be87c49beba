//! 角色授权
//!
//! 所有服务操作入口调用 [`can_perform`]；权限完全由角色与订单归属决定。
//!
//! | 操作 | 经理 | 配送员 | 顾客 |
//! |------|------|--------|------|
//! | 创建 / 分配 / 删除订单 | ✓ | | |
//! | 列表 / 查看订单 | 全部 | 仅分配给自己的 | |
//! | PREPARING / READY_FOR_PICKUP / CANCELLED | ✓ | | |
//! | PICKED_UP / ON_ROUTE / DELIVERED | | 仅分配给自己的 | |
//! | 配送员列表 | ✓ | | |
//! | 配送员订单 / 统计 | ✓ | 仅自己 | |
//! | 切换接单状态 | | 仅自己 | |
//! | 启用 / 停用账号 | ✓ | | |
//! | 实时订阅 | ✓ | ✓ | |
//! | 支付校验 | ✓ | ✓ | ✓ |

use shared::models::{Order, OrderStatus, Role};

use crate::auth::CurrentUser;

/// Operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateOrder,
    ListOrders,
    ViewOrder,
    /// Move an order into the given status
    AdvanceOrder(OrderStatus),
    AssignOrder,
    DeleteOrder,
    ListPartners,
    /// Read a partner's orders / stats
    ViewPartner(i64),
    SetAvailability(i64),
    ManageUsers,
    Subscribe,
    VerifyPayment,
}

/// Whether `actor` may perform `action`, optionally on a specific order.
///
/// Order-scoped actions (`ViewOrder`, partner-driven `AdvanceOrder`) deny
/// when the order is not supplied.
pub fn can_perform(actor: &CurrentUser, action: Action, order: Option<&Order>) -> bool {
    let owns_order = || order.is_some_and(|o| o.is_assigned_to(actor.id));

    match (actor.role, action) {
        (Role::RestaurantManager, Action::CreateOrder)
        | (Role::RestaurantManager, Action::ListOrders)
        | (Role::RestaurantManager, Action::ViewOrder)
        | (Role::RestaurantManager, Action::AssignOrder)
        | (Role::RestaurantManager, Action::DeleteOrder)
        | (Role::RestaurantManager, Action::ListPartners)
        | (Role::RestaurantManager, Action::ViewPartner(_))
        | (Role::RestaurantManager, Action::ManageUsers)
        | (Role::RestaurantManager, Action::Subscribe) => true,

        (Role::RestaurantManager, Action::AdvanceOrder(status)) => matches!(
            status,
            OrderStatus::Preparing | OrderStatus::ReadyForPickup | OrderStatus::Cancelled
        ),

        (Role::DeliveryPartner, Action::ListOrders) | (Role::DeliveryPartner, Action::Subscribe) => {
            true
        }
        (Role::DeliveryPartner, Action::ViewOrder) => owns_order(),
        (Role::DeliveryPartner, Action::AdvanceOrder(status)) => {
            matches!(
                status,
                OrderStatus::PickedUp | OrderStatus::OnRoute | OrderStatus::Delivered
            ) && owns_order()
        }
        (Role::DeliveryPartner, Action::ViewPartner(id))
        | (Role::DeliveryPartner, Action::SetAvailability(id)) => id == actor.id,

        (_, Action::VerifyPayment) => true,

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::Customer;

    fn user(id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            name: format!("user-{id}"),
            email: format!("user{id}@example.com"),
            role,
        }
    }

    fn order_for(partner: Option<i64>, status: OrderStatus) -> Order {
        Order {
            id: "ORD250101120000001".into(),
            items: vec![],
            customer: Customer {
                name: "C".into(),
                phone: "1".into(),
                address: "A".into(),
            },
            total_amount: Decimal::ZERO,
            prep_time: 10,
            status,
            assigned_partner: partner,
            assigned_at: None,
            dispatch_time: None,
            actual_delivery_time: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn manager_drives_kitchen_statuses_only() {
        let manager = user(1, Role::RestaurantManager);
        assert!(can_perform(&manager, Action::AdvanceOrder(OrderStatus::Preparing), None));
        assert!(can_perform(&manager, Action::AdvanceOrder(OrderStatus::Cancelled), None));
        assert!(!can_perform(&manager, Action::AdvanceOrder(OrderStatus::PickedUp), None));
        assert!(!can_perform(&manager, Action::AdvanceOrder(OrderStatus::Assigned), None));
    }

    #[test]
    fn partner_advances_only_own_orders() {
        let partner = user(7, Role::DeliveryPartner);
        let own = order_for(Some(7), OrderStatus::Assigned);
        let other = order_for(Some(8), OrderStatus::Assigned);

        let pick_up = Action::AdvanceOrder(OrderStatus::PickedUp);
        assert!(can_perform(&partner, pick_up, Some(&own)));
        assert!(!can_perform(&partner, pick_up, Some(&other)));
        assert!(!can_perform(&partner, pick_up, None));
        assert!(!can_perform(&partner, Action::AdvanceOrder(OrderStatus::Preparing), Some(&own)));
    }

    #[test]
    fn partner_sees_only_self() {
        let partner = user(7, Role::DeliveryPartner);
        assert!(can_perform(&partner, Action::ViewPartner(7), None));
        assert!(!can_perform(&partner, Action::ViewPartner(8), None));
        assert!(can_perform(&partner, Action::SetAvailability(7), None));
        assert!(!can_perform(&partner, Action::ListPartners, None));
    }

    #[test]
    fn customers_are_limited_to_payments() {
        let customer = user(3, Role::Customer);
        assert!(!can_perform(&customer, Action::ListOrders, None));
        assert!(!can_perform(&customer, Action::Subscribe, None));
        assert!(!can_perform(&customer, Action::CreateOrder, None));
        assert!(can_perform(&customer, Action::VerifyPayment, None));
    }

    #[test]
    fn managers_cannot_toggle_partner_availability() {
        let manager = user(1, Role::RestaurantManager);
        assert!(!can_perform(&manager, Action::SetAvailability(7), None));
        assert!(can_perform(&manager, Action::ViewPartner(7), None));
    }
}
