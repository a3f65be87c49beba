//! Payment gateway signature verification
//!
//! The checkout widget posts back `order_id`, `payment_id` and a hex
//! HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed with the gateway secret.
//! Every attempt is recorded, successful or not.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::models::{Payment, PaymentStatus, PaymentVerifyRequest};
use sqlx::SqlitePool;

use crate::db::repository::{RepoResult, payment};

fn signed_payload(gateway_order_id: &str, payment_id: &str) -> String {
    format!("{gateway_order_id}|{payment_id}")
}

/// Verify a gateway signature (constant-time comparison)
pub fn verify_signature(
    secret: &str,
    gateway_order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), &'static str> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(signed_payload(gateway_order_id, payment_id).as_bytes());

    let sig_bytes = hex::decode(signature.trim()).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Payment signature mismatch")
}

/// Produce the signature the gateway would send
pub fn sign(secret: &str, gateway_order_id: &str, payment_id: &str) -> String {
    // HMAC accepts keys of any length
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(signed_payload(gateway_order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify `req` and persist the attempt with its outcome
pub async fn verify_and_record(
    pool: &SqlitePool,
    secret: &str,
    req: &PaymentVerifyRequest,
) -> RepoResult<Payment> {
    let status = match verify_signature(secret, &req.gateway_order_id, &req.payment_id, &req.signature)
    {
        Ok(()) => PaymentStatus::Paid,
        Err(reason) => {
            tracing::warn!(
                gateway_order_id = %req.gateway_order_id,
                payment_id = %req.payment_id,
                reason,
                "Payment verification failed"
            );
            PaymentStatus::Failed
        }
    };

    let record = Payment {
        id: shared::util::snowflake_id(),
        gateway_order_id: req.gateway_order_id.clone(),
        payment_id: req.payment_id.clone(),
        signature: req.signature.clone(),
        amount: req.amount,
        status,
        created_at: shared::util::now_millis(),
    };
    payment::insert(pool, &record).await?;

    if status == PaymentStatus::Paid {
        tracing::info!(gateway_order_id = %record.gateway_order_id, amount = %record.amount, "Payment verified");
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use rust_decimal::Decimal;

    const SECRET: &str = "test-gateway-secret";

    #[test]
    fn accepts_matching_signature() {
        let sig = sign(SECRET, "order_1", "pay_1");
        assert_eq!(sig.len(), 64);
        assert!(verify_signature(SECRET, "order_1", "pay_1", &sig).is_ok());
    }

    #[test]
    fn rejects_tampered_fields_and_bad_hex() {
        let sig = sign(SECRET, "order_1", "pay_1");
        assert!(verify_signature(SECRET, "order_1", "pay_2", &sig).is_err());
        assert!(verify_signature("other-secret", "order_1", "pay_1", &sig).is_err());
        assert_eq!(
            verify_signature(SECRET, "order_1", "pay_1", "not-hex"),
            Err("Invalid signature hex")
        );
    }

    #[tokio::test]
    async fn every_attempt_is_recorded() {
        let db = DbService::in_memory().await.unwrap();
        let mut req = PaymentVerifyRequest {
            gateway_order_id: "order_9".into(),
            payment_id: "pay_9".into(),
            signature: sign(SECRET, "order_9", "pay_9"),
            amount: Decimal::new(49900, 2),
        };

        let paid = verify_and_record(&db.pool, SECRET, &req).await.unwrap();
        assert_eq!(paid.status, PaymentStatus::Paid);

        req.signature = "00".repeat(32);
        let failed = verify_and_record(&db.pool, SECRET, &req).await.unwrap();
        assert_eq!(failed.status, PaymentStatus::Failed);

        for status in [PaymentStatus::Paid, PaymentStatus::Failed] {
            let count = payment::count_for_gateway_order(&db.pool, "order_9", status)
                .await
                .unwrap();
            assert_eq!(count, 1);
        }
    }
}
