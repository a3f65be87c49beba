//! NotificationHub - 订单变更实时分发
//!
//! ```text
//! OrderService
//!       │ publish(OrderEvent)   (同步、非阻塞)
//!       ▼
//! NotificationHub
//!   ├── restaurant: Sender<OrderEvent> ──► 经理 WS 会话
//!   └── delivery:   Sender<OrderEvent> ──► 配送员 WS 会话 (客户端自行过滤)
//! ```
//!
//! 尽力投递：无订阅者时事件直接丢弃，落后的订阅者跳过错过的事件，需重新拉取。

pub mod ws;

use dashmap::DashMap;
use shared::OrderEvent;
use shared::models::Role;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast channel 容量 - 足以缓冲突发的状态更新
const BROADCAST_CAPACITY: usize = 256;

/// Maximum concurrent WS sessions per user
pub const MAX_SESSIONS_PER_USER: usize = 5;

/// Sink for order change events, injected into the order service
pub trait NotificationChannel: Send + Sync {
    /// Fire-and-forget; must not block or fail the caller
    fn publish(&self, event: OrderEvent);
}

/// 订阅分区 (按角色)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Restaurant,
    Delivery,
}

impl Partition {
    /// Customers have no real-time partition
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::RestaurantManager => Some(Self::Restaurant),
            Role::DeliveryPartner => Some(Self::Delivery),
            Role::Customer => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Delivery => "delivery",
        }
    }
}

pub struct NotificationHub {
    restaurant: broadcast::Sender<OrderEvent>,
    delivery: broadcast::Sender<OrderEvent>,
    /// user_id → open WS sessions; no entry at zero
    sessions: DashMap<i64, usize>,
}

impl NotificationHub {
    pub fn new() -> Self {
        let (restaurant, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (delivery, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            restaurant,
            delivery,
            sessions: DashMap::new(),
        }
    }

    fn sender(&self, partition: Partition) -> &broadcast::Sender<OrderEvent> {
        match partition {
            Partition::Restaurant => &self.restaurant,
            Partition::Delivery => &self.delivery,
        }
    }

    pub fn subscribe(&self, partition: Partition) -> broadcast::Receiver<OrderEvent> {
        self.sender(partition).subscribe()
    }

    pub fn subscriber_count(&self, partition: Partition) -> usize {
        self.sender(partition).receiver_count()
    }

    /// Reserve a session slot for `user_id`; `None` when the limit is reached.
    ///
    /// The slot is held until the returned guard is dropped.
    pub fn try_open_session(self: &Arc<Self>, user_id: i64) -> Option<SessionGuard> {
        let mut open = self.sessions.entry(user_id).or_insert(0);
        if *open >= MAX_SESSIONS_PER_USER {
            return None;
        }
        *open += 1;
        drop(open);

        Some(SessionGuard {
            hub: Arc::clone(self),
            user_id,
        })
    }

    fn release_session(&self, user_id: i64) {
        self.sessions.remove_if_mut(&user_id, |_, open| {
            *open = open.saturating_sub(1);
            *open == 0
        });
    }
}

/// One reserved WS session slot, released on drop
pub struct SessionGuard {
    hub: Arc<NotificationHub>,
    user_id: i64,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.hub.release_session(self.user_id);
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel for NotificationHub {
    fn publish(&self, event: OrderEvent) {
        for partition in [Partition::Restaurant, Partition::Delivery] {
            if self.sender(partition).send(event.clone()).is_err() {
                tracing::debug!(
                    partition = partition.as_str(),
                    order_id = %event.order_id,
                    "No subscribers, event dropped"
                );
            }
        }
    }
}
