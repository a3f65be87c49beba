//! Payment Repository

use super::RepoResult;
use shared::models::{Payment, PaymentStatus};
use sqlx::SqlitePool;

pub async fn insert(pool: &SqlitePool, payment: &Payment) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO payments (id, gateway_order_id, payment_id, signature, amount, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(payment.id)
    .bind(&payment.gateway_order_id)
    .bind(&payment.payment_id)
    .bind(&payment.signature)
    .bind(payment.amount.to_string())
    .bind(payment.status)
    .bind(payment.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Number of recorded attempts with the given outcome for a gateway order
pub async fn count_for_gateway_order(
    pool: &SqlitePool,
    gateway_order_id: &str,
    status: PaymentStatus,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM payments WHERE gateway_order_id = ? AND status = ?",
    )
    .bind(gateway_order_id)
    .bind(status)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
