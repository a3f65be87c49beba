//! Payment Routes
//!
//! POST /api/payments/verify - 校验网关回传签名并记录结果

use axum::{Router, extract::State, routing::post};
use rust_decimal::Decimal;
use shared::models::{Payment, PaymentStatus, PaymentVerifyRequest};

use crate::auth::{Action, CurrentUser, can_perform};
use crate::core::ServerState;
use crate::payments;
use crate::utils::validation::{FieldErrors, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResponse, AppResult, Json, ok_with_message};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/payments/verify", post(verify))
}

/// POST /api/payments/verify
///
/// The attempt is recorded either way; a mismatched signature answers 400.
pub async fn verify(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(req): Json<PaymentVerifyRequest>,
) -> AppResult<Json<AppResponse<Payment>>> {
    if !can_perform(&current, Action::VerifyPayment, None) {
        return Err(AppError::forbidden("Not allowed to verify payments"));
    }

    let mut errors = FieldErrors::new();
    errors.required_text(&req.gateway_order_id, "gatewayOrderId", MAX_SHORT_TEXT_LEN);
    errors.required_text(&req.payment_id, "paymentId", MAX_SHORT_TEXT_LEN);
    errors.required_text(&req.signature, "signature", MAX_SHORT_TEXT_LEN);
    if req.amount < Decimal::ZERO {
        errors.push("amount", "amount must not be negative");
    }
    errors.finish(|| ()).into_result().map_err(AppError::ValidationFailed)?;

    let payment =
        payments::verify_and_record(state.pool(), &state.config.payment_secret, &req).await?;

    match payment.status {
        PaymentStatus::Paid => Ok(ok_with_message(payment, "Payment verified")),
        PaymentStatus::Failed => Err(AppError::validation("Invalid signature")),
    }
}
