//! Authentication Handlers
//!
//! Registration, login and the current-user lookup

use axum::{extract::State, http::StatusCode};
use shared::models::{AuthResponse, LoginRequest, RegisterRequest, Role, User};

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser};
use crate::security_log;
use crate::utils::validation::{
    FieldErrors, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN,
    MIN_PASSWORD_LEN, Validated,
};
use crate::utils::{AppError, AppResponse, AppResult, Json, ok};

/// Minimal shape check: one `@` with text on both sides and a dotted domain
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Validate a registration payload; the email is trimmed and lower-cased.
pub fn validate_registration(req: &RegisterRequest) -> Validated<NewUser> {
    let mut errors = FieldErrors::new();
    let email = req.email.trim().to_lowercase();

    errors.required_text(&req.name, "name", MAX_NAME_LEN);
    errors.required_text(&email, "email", MAX_EMAIL_LEN);
    if !email.is_empty() && !looks_like_email(&email) {
        errors.push("email", "email is not a valid address");
    }
    let password_len = req.password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password_len) {
        errors.push(
            "password",
            format!("password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"),
        );
    }
    errors.required_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN);

    errors.finish(|| NewUser {
        name: req.name.trim().to_string(),
        email,
        // filled in after hashing
        password_hash: String::new(),
        phone: req.phone.trim().to_string(),
        role: req.role.unwrap_or(Role::Customer),
    })
}

fn issue_token(state: &ServerState, user: User) -> AppResult<AuthResponse> {
    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    Ok(AuthResponse { token, user })
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<AuthResponse>>)> {
    let mut new_user = validate_registration(&req)
        .into_result()
        .map_err(AppError::ValidationFailed)?;

    new_user.password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let created = user::create(state.pool(), new_user).await?;
    tracing::info!(user_id = created.id, role = %created.role, "User registered");

    Ok((StatusCode::CREATED, ok(issue_token(&state, created)?)))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password share one error to avoid account enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<AuthResponse>>> {
    let email = req.email.trim().to_lowercase();

    let account = match user::find_by_email(state.pool(), &email).await? {
        Some(account) if verify_password(&req.password, &account.password_hash) => account,
        Some(_) => {
            security_log!("WARN", "login_failed", email = email.as_str(), reason = "bad_password");
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", email = email.as_str(), reason = "unknown_email");
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        security_log!("WARN", "login_inactive_account", user_id = account.id);
        return Err(AppError::forbidden("Account has been disabled"));
    }

    tracing::info!(user_id = account.id, "User logged in");
    Ok(ok(issue_token(&state, account)?))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<AppResponse<User>>> {
    let account = user::find_by_id(state.pool(), current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current.id)))?;
    Ok(ok(account))
}
