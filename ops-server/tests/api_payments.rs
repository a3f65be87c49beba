mod common;

use common::TestApp;
use http::StatusCode;
use ops_server::db::repository::payment;
use ops_server::payments;
use serde_json::json;
use shared::models::{PaymentStatus, Role};

#[tokio::test]
async fn payment_verification_records_every_attempt() {
    let app = TestApp::new().await;
    let (_, customer) = app.user("eater@ops.test", Role::Customer).await;
    let secret = app.state.config.payment_secret.clone();

    let (status, body) = app
        .post(
            "/api/payments/verify",
            &customer,
            json!({
                "razorpay_order_id": "order_A1",
                "razorpay_payment_id": "pay_A1",
                "razorpay_signature": payments::sign(&secret, "order_A1", "pay_A1"),
                "amount": 361
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "PAID");

    let (status, body) = app
        .post(
            "/api/payments/verify",
            &customer,
            json!({
                "gatewayOrderId": "order_A1",
                "paymentId": "pay_A2",
                "signature": payments::sign(&secret, "order_A1", "pay_A1")
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid signature");

    for status in [PaymentStatus::Paid, PaymentStatus::Failed] {
        let n = payment::count_for_gateway_order(app.state.pool(), "order_A1", status)
            .await
            .expect("count");
        assert_eq!(n, 1);
    }
}
