//! Data models
//!
//! JSON 一律使用 camelCase；枚举使用 SCREAMING_SNAKE_CASE。

pub mod order;
pub mod payment;
pub mod user;

pub use order::{
    AssignRequest, CreateOrderRequest, Customer, CustomerInput, Order, OrderItem, OrderItemInput,
    OrderListQuery, OrderStatus, UpdateStatusRequest,
};
pub use payment::{Payment, PaymentStatus, PaymentVerifyRequest};
pub use user::{
    ActiveUpdate, AuthResponse, AvailabilityUpdate, LoginRequest, PartnerStats, PartnerSummary,
    RegisterRequest, Role, User,
};
