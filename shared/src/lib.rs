//! Shared types for Zomato Ops Pro
//!
//! 服务端与客户端共用的领域类型：订单、用户、支付记录、实时事件。

pub mod event;
pub mod models;
pub mod util;

// Re-exports
pub use event::{OrderEvent, OrderEventKind};
pub use models::{
    Customer, Order, OrderItem, OrderStatus, Payment, PaymentStatus, Role, User,
};
pub use serde::{Deserialize, Serialize};
