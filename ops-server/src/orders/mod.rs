//! 订单生命周期
//!
//! ```text
//! API handler
//!     │ CurrentUser + request
//!     ▼
//! OrderService ──► can_perform
//!     │
//!     ├── validation  (CreateOrderRequest → NewOrder)
//!     ├── id          (ORDyyMMddHHmmssNNN, 冲突重试)
//!     ├── lifecycle   (状态机、出餐时间)
//!     ├── assignment  (配送员校验、容量上限)
//!     │
//!     ├──► repository::order::update_guarded  (条件写)
//!     └──► NotificationChannel::publish       (尽力投递)
//! ```

pub mod assignment;
pub mod id;
pub mod lifecycle;
pub mod service;
pub mod stats;
pub mod validation;

pub use service::{OrderService, PartnerOrderScope};

use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::{AppError, FieldError};

/// 订单领域错误
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Invalid order input")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} already has a delivery partner")]
    AlreadyAssigned(String),

    #[error("Delivery partner {partner_id} already has {active} active orders")]
    CapacityExceeded { partner_id: i64, active: i64 },

    #[error("Order {0} was modified concurrently, reload and retry")]
    Conflict(String),

    #[error("Order {id} is {status}; only delivered orders can be deleted")]
    NotDeletable { id: String, status: OrderStatus },

    #[error("Could not allocate a unique order id after {0} attempts")]
    DuplicateId(usize),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Validation(fields) => AppError::ValidationFailed(fields),
            OrderError::Forbidden(_) => AppError::Forbidden(message),
            OrderError::NotFound(_) => AppError::NotFound(message),
            OrderError::InvalidTransition { .. } => AppError::InvalidTransition(message),
            OrderError::AlreadyAssigned(_) => AppError::AlreadyAssigned(message),
            OrderError::CapacityExceeded { .. } => AppError::CapacityExceeded(message),
            OrderError::Conflict(_) => AppError::Conflict(message),
            OrderError::NotDeletable { .. } => AppError::NotDeletable(message),
            OrderError::DuplicateId(_) => AppError::DuplicateId(message),
            OrderError::Repo(repo) => repo.into(),
        }
    }
}
