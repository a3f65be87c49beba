//! Order Repository
//!
//! Items are stored as JSON text and amounts as decimal text. Mutations go
//! through [`update_guarded`], which only applies when the stored status and
//! partner still match what the caller read.

use super::{RepoError, RepoResult};
use rust_decimal::Decimal;
use shared::models::{Customer, Order, OrderItem, OrderStatus};
use sqlx::SqlitePool;
use std::str::FromStr;

const ORDER_COLUMNS: &str = "id, items, customer_name, customer_phone, customer_address, total_amount, prep_time, status, assigned_partner, assigned_at, dispatch_time, actual_delivery_time, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    items: String,
    customer_name: String,
    customer_phone: String,
    customer_address: String,
    total_amount: String,
    prep_time: i64,
    status: OrderStatus,
    assigned_partner: Option<i64>,
    assigned_at: Option<i64>,
    dispatch_time: Option<i64>,
    actual_delivery_time: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)
            .map_err(|e| RepoError::Database(format!("Corrupt items for {}: {e}", row.id)))?;
        let total_amount = Decimal::from_str(&row.total_amount)
            .map_err(|e| RepoError::Database(format!("Corrupt total for {}: {e}", row.id)))?;

        Ok(Order {
            id: row.id,
            items,
            customer: Customer {
                name: row.customer_name,
                phone: row.customer_phone,
                address: row.customer_address,
            },
            total_amount,
            prep_time: row.prep_time,
            status: row.status,
            assigned_partner: row.assigned_partner,
            assigned_at: row.assigned_at,
            dispatch_time: row.dispatch_time,
            actual_delivery_time: row.actual_delivery_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_orders(rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    rows.into_iter().map(Order::try_from).collect()
}

/// `'ASSIGNED', 'PICKED_UP'` style list for IN clauses (static enum names only)
fn status_list(statuses: &[OrderStatus]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Insert a new order; `Duplicate` when the id already exists
pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    let items = serde_json::to_string(&order.items)
        .map_err(|e| RepoError::Validation(format!("Unserializable items: {e}")))?;

    sqlx::query(&format!(
        "INSERT INTO orders ({ORDER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&order.id)
    .bind(items)
    .bind(&order.customer.name)
    .bind(&order.customer.phone)
    .bind(&order.customer.address)
    .bind(order.total_amount.to_string())
    .bind(order.prep_time)
    .bind(order.status)
    .bind(order.assigned_partner)
    .bind(order.assigned_at)
    .bind(order.dispatch_time)
    .bind(order.actual_delivery_time)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(Order::try_from).transpose()
}

/// All orders, newest first, optionally filtered by status
pub async fn list(pool: &SqlitePool, status: Option<OrderStatus>) -> RepoResult<Vec<Order>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, OrderRow>(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE status = ? ORDER BY created_at DESC, id DESC"
            ))
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, OrderRow>(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    into_orders(rows)
}

/// Orders assigned to a partner, newest first; empty `statuses` means all
pub async fn list_for_partner(
    pool: &SqlitePool,
    partner_id: i64,
    statuses: &[OrderStatus],
) -> RepoResult<Vec<Order>> {
    let filter = if statuses.is_empty() {
        String::new()
    } else {
        format!("AND status IN ({})", status_list(statuses))
    };
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE assigned_partner = ? {filter} ORDER BY created_at DESC, id DESC"
    ))
    .bind(partner_id)
    .fetch_all(pool)
    .await?;
    into_orders(rows)
}

/// Orders currently counting against the partner's capacity
pub async fn count_active_for_partner(pool: &SqlitePool, partner_id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM orders WHERE assigned_partner = ? AND status IN ({})",
        status_list(&OrderStatus::ACTIVE)
    ))
    .bind(partner_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Persist the mutable fields of `order` only if the stored row still has
/// `expected_status` and `expected_partner`.
///
/// Returns `false` when nothing matched (row gone or changed concurrently).
pub async fn update_guarded(
    pool: &SqlitePool,
    order: &Order,
    expected_status: OrderStatus,
    expected_partner: Option<i64>,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?, assigned_partner = ?, assigned_at = ?, dispatch_time = ?, actual_delivery_time = ?, updated_at = ? \
         WHERE id = ? AND status = ? AND assigned_partner IS ?",
    )
    .bind(order.status)
    .bind(order.assigned_partner)
    .bind(order.assigned_at)
    .bind(order.dispatch_time)
    .bind(order.actual_delivery_time)
    .bind(order.updated_at)
    .bind(&order.id)
    .bind(expected_status)
    .bind(expected_partner)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Delete an order only once it has been delivered
pub async fn delete_delivered(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ? AND status = 'DELIVERED'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() == 1)
}
