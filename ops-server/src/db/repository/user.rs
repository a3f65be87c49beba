//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{PartnerSummary, Role, User};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, role, is_active, is_available, created_at, updated_at";

/// Insert payload (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: Role,
}

/// Create a user; `Duplicate` when the email is taken
pub async fn create(pool: &SqlitePool, data: NewUser) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, phone, role, is_active, is_available, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.phone)
    .bind(data.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Email '{}' is already registered", data.email))
        }
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user =
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(user)
}

/// Partner toggles whether they accept new orders
pub async fn set_availability(pool: &SqlitePool, id: i64, is_available: bool) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE users SET is_available = ?, updated_at = ? WHERE id = ? AND role = 'DELIVERY_PARTNER'",
    )
    .bind(is_available)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Delivery partner {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Delivery partner {id} not found")))
}

/// Activate / deactivate an account (accounts are never deleted)
pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Delivery partners with their current active-order count.
///
/// `available_only` restricts to active accounts that accept orders.
pub async fn list_partners(
    pool: &SqlitePool,
    available_only: bool,
) -> RepoResult<Vec<PartnerSummary>> {
    let filter = if available_only {
        "AND u.is_active = 1 AND u.is_available = 1"
    } else {
        ""
    };
    let sql = format!(
        "SELECT u.id, u.name, u.email, u.phone, u.is_active, u.is_available, \
         (SELECT COUNT(*) FROM orders o WHERE o.assigned_partner = u.id \
          AND o.status IN ('ASSIGNED', 'PICKED_UP', 'ON_ROUTE')) AS active_orders \
         FROM users u WHERE u.role = 'DELIVERY_PARTNER' {filter} ORDER BY u.name"
    );
    let partners = sqlx::query_as::<_, PartnerSummary>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(partners)
}
