//! Real-time order events
//!
//! Wire form: `{ "type": "orderAssigned", "orderId": "ORD...", "payload": { ...order } }`

use serde::{Deserialize, Serialize};

use crate::models::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderEventKind {
    NewOrder,
    OrderStatusUpdated,
    OrderAssigned,
    OrderDeleted,
}

/// 订单变更通知（尽力投递，不持久化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    #[serde(rename = "type")]
    pub kind: OrderEventKind,
    pub order_id: String,
    /// Full order snapshot; `None` for deletions
    pub payload: Option<Order>,
}

impl OrderEvent {
    pub fn new_order(order: &Order) -> Self {
        Self::with_order(OrderEventKind::NewOrder, order)
    }

    pub fn status_updated(order: &Order) -> Self {
        Self::with_order(OrderEventKind::OrderStatusUpdated, order)
    }

    pub fn assigned(order: &Order) -> Self {
        Self::with_order(OrderEventKind::OrderAssigned, order)
    }

    pub fn deleted(order_id: impl Into<String>) -> Self {
        Self {
            kind: OrderEventKind::OrderDeleted,
            order_id: order_id.into(),
            payload: None,
        }
    }

    fn with_order(kind: OrderEventKind, order: &Order) -> Self {
        Self {
            kind,
            order_id: order.id.clone(),
            payload: Some(order.clone()),
        }
    }
}
