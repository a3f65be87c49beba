//! JWT Extractor
//!
//! Custom extractor for automatically validating JWT tokens

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;

/// 校验令牌并加载当前账号
///
/// 账号不存在或已停用时拒绝，即使令牌本身仍然有效。
pub async fn resolve_user(state: &ServerState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = format!("{}", e));
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id = claims
        .user_id()
        .map_err(|e| AppError::invalid_token(e.to_string()))?;

    match user::find_by_id(state.pool(), user_id).await? {
        Some(account) if account.is_active => Ok(CurrentUser::from(&account)),
        Some(_) => {
            security_log!("WARN", "auth_inactive_account", user_id = user_id);
            Err(AppError::unauthorized())
        }
        None => {
            security_log!("WARN", "auth_unknown_account", user_id = user_id);
            Err(AppError::unauthorized())
        }
    }
}

/// JWT Auth Extractor
///
/// Use this extractor in protected handlers to automatically validate JWT
/// and extract CurrentUser
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        let user = resolve_user(state, token).await?;

        // Store in extensions for potential reuse
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
