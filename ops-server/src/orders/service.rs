//! Order Service
//!
//! Orchestrates validation, the lifecycle engine and assignment rules against
//! the order store, then publishes the resulting event. Every operation checks
//! `can_perform` before touching the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::OrderEvent;
use shared::models::{CreateOrderRequest, Order, OrderStatus, PartnerStats, Role};
use sqlx::SqlitePool;

use super::id::{ID_RETRY_LIMIT, generate_order_id};
use super::validation::validate_new_order;
use super::{OrderError, assignment, lifecycle, stats};
use crate::auth::{Action, CurrentUser, can_perform};
use crate::db::repository::{RepoError, order as order_repo, user as user_repo};
use crate::notify::NotificationChannel;

type Result<T> = std::result::Result<T, OrderError>;

/// Which of a partner's orders to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerOrderScope {
    All,
    /// ASSIGNED / PICKED_UP / ON_ROUTE
    Active,
    /// DELIVERED
    Completed,
}

impl PartnerOrderScope {
    fn statuses(&self) -> &'static [OrderStatus] {
        match self {
            Self::All => &[],
            Self::Active => &OrderStatus::ACTIVE,
            Self::Completed => &[OrderStatus::Delivered],
        }
    }
}

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    notifier: Arc<dyn NotificationChannel>,
    partner_eta_minutes: i64,
}

impl OrderService {
    pub fn new(
        pool: SqlitePool,
        notifier: Arc<dyn NotificationChannel>,
        partner_eta_minutes: i64,
    ) -> Self {
        Self {
            pool,
            notifier,
            partner_eta_minutes,
        }
    }

    /// Validate and persist a new PENDING order, then announce it.
    ///
    /// Id collisions are retried with a fresh id; the caller only sees
    /// `DuplicateId` once every attempt collided.
    pub async fn create(&self, actor: &CurrentUser, req: CreateOrderRequest) -> Result<Order> {
        self.create_with_ids(actor, req, |now| {
            generate_order_id(now, &mut rand::thread_rng())
        })
        .await
    }

    /// [`create`](Self::create) with the id source supplied by the caller
    async fn create_with_ids<F>(
        &self,
        actor: &CurrentUser,
        req: CreateOrderRequest,
        mut next_id: F,
    ) -> Result<Order>
    where
        F: FnMut(DateTime<Utc>) -> String + Send,
    {
        if !can_perform(actor, Action::CreateOrder, None) {
            return Err(OrderError::Forbidden(
                "Only restaurant managers can create orders".into(),
            ));
        }

        let new_order = validate_new_order(&req)
            .into_result()
            .map_err(OrderError::Validation)?;

        for attempt in 1..=ID_RETRY_LIMIT {
            let now = Utc::now();
            let id = next_id(now);
            let order = lifecycle::new_pending_order(
                id,
                new_order.clone(),
                now.timestamp_millis(),
                self.partner_eta_minutes,
            );

            match order_repo::insert(&self.pool, &order).await {
                Ok(()) => {
                    tracing::info!(order_id = %order.id, created_by = actor.id, "Order created");
                    self.notifier.publish(OrderEvent::new_order(&order));
                    return Ok(order);
                }
                Err(RepoError::Duplicate(_)) => {
                    tracing::warn!(order_id = %order.id, attempt, "Order id collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(OrderError::DuplicateId(ID_RETRY_LIMIT))
    }

    /// Managers see every order, partners only those assigned to them.
    pub async fn list(
        &self,
        actor: &CurrentUser,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>> {
        if !can_perform(actor, Action::ListOrders, None) {
            return Err(OrderError::Forbidden("Not allowed to list orders".into()));
        }

        let orders = match actor.role {
            Role::RestaurantManager => order_repo::list(&self.pool, status).await?,
            _ => {
                let filter: Vec<OrderStatus> = status.into_iter().collect();
                order_repo::list_for_partner(&self.pool, actor.id, &filter).await?
            }
        };
        Ok(orders)
    }

    pub async fn get(&self, actor: &CurrentUser, id: &str) -> Result<Order> {
        let order = self.load(id).await?;
        if !can_perform(actor, Action::ViewOrder, Some(&order)) {
            return Err(OrderError::Forbidden(format!("Not allowed to view order {id}")));
        }
        Ok(order)
    }

    /// Advance an order along the lifecycle
    pub async fn update_status(
        &self,
        actor: &CurrentUser,
        id: &str,
        requested: OrderStatus,
    ) -> Result<Order> {
        let mut order = self.load(id).await?;
        let (expected_status, expected_partner) = (order.status, order.assigned_partner);

        let event = lifecycle::apply_transition(
            &mut order,
            requested,
            actor,
            shared::util::now_millis(),
        )?;
        self.persist(&order, expected_status, expected_partner).await?;

        tracing::info!(
            order_id = %order.id,
            from = %expected_status,
            to = %order.status,
            actor = actor.id,
            "Order status updated"
        );
        self.notifier.publish(event);
        Ok(order)
    }

    /// Assign a delivery partner to a READY_FOR_PICKUP order
    pub async fn assign(&self, actor: &CurrentUser, id: &str, partner_id: i64) -> Result<Order> {
        if !can_perform(actor, Action::AssignOrder, None) {
            return Err(OrderError::Forbidden(
                "Only restaurant managers can assign orders".into(),
            ));
        }

        let mut order = self.load(id).await?;
        let partner = user_repo::find_by_id(&self.pool, partner_id).await?;
        let active = order_repo::count_active_for_partner(&self.pool, partner_id).await?;
        let (expected_status, expected_partner) = (order.status, order.assigned_partner);

        let event = assignment::assign(
            &mut order,
            partner.as_ref(),
            active,
            actor,
            shared::util::now_millis(),
            self.partner_eta_minutes,
        )?;
        self.persist(&order, expected_status, expected_partner).await?;

        tracing::info!(order_id = %order.id, partner_id, active_before = active, "Order assigned");
        self.notifier.publish(event);
        Ok(order)
    }

    /// Remove a delivered order
    pub async fn delete(&self, actor: &CurrentUser, id: &str) -> Result<()> {
        if !can_perform(actor, Action::DeleteOrder, None) {
            return Err(OrderError::Forbidden(
                "Only restaurant managers can delete orders".into(),
            ));
        }

        let order = self.load(id).await?;
        if order.status != OrderStatus::Delivered {
            return Err(OrderError::NotDeletable {
                id: order.id,
                status: order.status,
            });
        }
        if !order_repo::delete_delivered(&self.pool, id).await? {
            return Err(OrderError::Conflict(id.to_string()));
        }

        tracing::info!(order_id = %id, actor = actor.id, "Order deleted");
        self.notifier.publish(OrderEvent::deleted(id));
        Ok(())
    }

    /// Orders assigned to a partner (the partner themselves or a manager)
    pub async fn partner_orders(
        &self,
        actor: &CurrentUser,
        partner_id: i64,
        scope: PartnerOrderScope,
    ) -> Result<Vec<Order>> {
        self.authorize_partner_view(actor, partner_id).await?;
        let orders = order_repo::list_for_partner(&self.pool, partner_id, scope.statuses()).await?;
        Ok(orders)
    }

    /// Trailing 30-day performance for a partner
    pub async fn partner_stats(&self, actor: &CurrentUser, partner_id: i64) -> Result<PartnerStats> {
        self.authorize_partner_view(actor, partner_id).await?;
        let orders = order_repo::list_for_partner(&self.pool, partner_id, &[]).await?;
        Ok(stats::partner_stats(&orders, shared::util::now_millis()))
    }

    async fn authorize_partner_view(&self, actor: &CurrentUser, partner_id: i64) -> Result<()> {
        if !can_perform(actor, Action::ViewPartner(partner_id), None) {
            return Err(OrderError::Forbidden(
                "Partners may only view their own orders".into(),
            ));
        }
        match user_repo::find_by_id(&self.pool, partner_id).await? {
            Some(user) if user.role == Role::DeliveryPartner => Ok(()),
            _ => Err(OrderError::NotFound(format!(
                "Delivery partner {partner_id} not found"
            ))),
        }
    }

    async fn load(&self, id: &str) -> Result<Order> {
        order_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {id} not found")))
    }

    /// Conditional write; distinguishes a vanished order from a lost race.
    async fn persist(
        &self,
        order: &Order,
        expected_status: OrderStatus,
        expected_partner: Option<i64>,
    ) -> Result<()> {
        if order_repo::update_guarded(&self.pool, order, expected_status, expected_partner).await? {
            return Ok(());
        }
        match order_repo::find_by_id(&self.pool, &order.id).await? {
            Some(_) => {
                tracing::warn!(order_id = %order.id, "Conditional update lost a race");
                Err(OrderError::Conflict(order.id.clone()))
            }
            None => Err(OrderError::NotFound(format!("Order {} not found", order.id))),
        }
    }
}
