//! User Administration Routes
//!
//! PATCH /api/users/{id}/active - 经理启用/停用账号 (账号不删除)

use axum::{
    Router,
    extract::{Path, State},
    routing::patch,
};
use shared::models::{ActiveUpdate, User};

use crate::auth::{Action, CurrentUser, can_perform};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::{AppError, AppResponse, AppResult, Json, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/users/{id}/active", patch(set_active))
}

/// PATCH /api/users/{id}/active
///
/// A deactivated user's outstanding tokens stop working on the next request.
pub async fn set_active(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<ActiveUpdate>,
) -> AppResult<Json<AppResponse<User>>> {
    if !can_perform(&current, Action::ManageUsers, None) {
        return Err(AppError::forbidden("Only restaurant managers can manage accounts"));
    }
    if id == current.id && !req.is_active {
        return Err(AppError::validation("You cannot deactivate your own account"));
    }

    let updated = user::set_active(state.pool(), id, req.is_active).await?;
    security_log!(
        "INFO",
        "account_active_changed",
        user_id = id,
        is_active = req.is_active,
        by = current.id
    );
    Ok(ok(updated))
}
