//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 订单状态
///
/// ```text
/// PENDING → PREPARING → READY_FOR_PICKUP → ASSIGNED → PICKED_UP → ON_ROUTE → DELIVERED
///    └──→ CANCELLED
/// ```
///
/// `READY` is accepted on input as an alias for `READY_FOR_PICKUP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Preparing,
    #[serde(alias = "READY")]
    ReadyForPickup,
    Assigned,
    PickedUp,
    OnRoute,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses that count against a partner's concurrent-order capacity.
    pub const ACTIVE: [OrderStatus; 3] = [Self::Assigned, Self::PickedUp, Self::OnRoute];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
            Self::Assigned => "ASSIGNED",
            Self::PickedUp => "PICKED_UP",
            Self::OnRoute => "ON_ROUTE",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// 配送中（占用配送员容量）
    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// 该状态下订单必须绑定配送员
    pub fn requires_partner(&self) -> bool {
        self.is_active() || *self == Self::Delivered
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 订单行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// 顾客信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `ORD` + yyMMddHHmmss + 3 random digits
    pub id: String,
    pub items: Vec<OrderItem>,
    pub customer: Customer,
    pub total_amount: Decimal,
    /// Preparation time in minutes
    pub prep_time: i64,
    pub status: OrderStatus,
    pub assigned_partner: Option<i64>,
    pub assigned_at: Option<i64>,
    /// Estimated dispatch timestamp (Unix millis)
    pub dispatch_time: Option<i64>,
    pub actual_delivery_time: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// 是否由指定配送员负责
    pub fn is_assigned_to(&self, partner_id: i64) -> bool {
        self.assigned_partner == Some(partner_id)
    }
}

// ========== Request payloads ==========

/// Raw order line as submitted; checked by order validation before use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemInput {
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Create order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
    #[serde(alias = "customerDetails")]
    pub customer: CustomerInput,
    /// Computed from the items when omitted
    pub total_amount: Option<Decimal>,
    pub prep_time: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(alias = "deliveryPartnerId")]
    pub partner_id: i64,
}

/// Query params for listing orders
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}
