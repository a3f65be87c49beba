mod common;

use common::TestApp;
use http::{Method, StatusCode};
use serde_json::json;
use shared::models::Role;

#[tokio::test]
async fn register_then_login() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Neha",
                "email": " Neha@Ops.Test ",
                "password": "hunter22",
                "phone": "9822222222",
                "role": "DELIVERY_PARTNER"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["user"]["email"], "neha@ops.test");
    assert_eq!(body["data"]["user"]["role"], "DELIVERY_PARTNER");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "neha@ops.test", "password": "hunter22" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Neha");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "neha@ops.test", "password": "wrong-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3004");
}

#[tokio::test]
async fn duplicate_email_and_bad_input() {
    let app = TestApp::new().await;
    app.user("taken@ops.test", Role::Customer).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Dup",
                "email": "TAKEN@ops.test",
                "password": "secret1",
                "phone": "1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": "", "email": "x", "password": "123", "phone": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn deactivated_accounts_lose_access() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let (rider, rider_token) = app.user("rider@ops.test", Role::DeliveryPartner).await;

    let (status, _) = app.get("/api/auth/me", &rider_token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .patch(
            &format!("/api/users/{}/active", rider.id),
            &manager,
            json!({ "isActive": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["isActive"], false);

    let (status, _) = app.get("/api/auth/me", &rider_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // partners cannot manage accounts
    let (_, other) = app.user("other@ops.test", Role::DeliveryPartner).await;
    let (status, _) = app
        .patch(
            &format!("/api/users/{}/active", rider.id),
            &other,
            json!({ "isActive": true }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn websocket_requires_token() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/ws", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");
}

#[tokio::test]
async fn websocket_rejects_garbage_token() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(Method::GET, "/api/ws?token=garbage", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3002");
}

#[tokio::test]
async fn websocket_refuses_customers() {
    let app = TestApp::new().await;
    let (_, token) = app.user("c@ops.test", Role::Customer).await;
    let (status, body) = app
        .request(Method::GET, &format!("/api/ws?token={token}"), None, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");
}
