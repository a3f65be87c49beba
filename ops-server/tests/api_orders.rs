mod common;

use common::{TestApp, order_body};
use http::{Method, StatusCode};
use ops_server::notify::Partition;
use serde_json::json;
use shared::models::Role;
use shared::{OrderEvent, OrderEventKind};

#[tokio::test]
async fn order_lifecycle_end_to_end() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let (partner, rider) = app.user("rider@ops.test", Role::DeliveryPartner).await;
    let mut events = app.state.hub.subscribe(Partition::Restaurant);

    let id = app.ready_order(&manager).await;
    let (status, body) = app.assign(&manager, &id, partner.id).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "ASSIGNED");
    assert_eq!(body["data"]["assignedPartner"], partner.id);

    for next in ["PICKED_UP", "ON_ROUTE", "DELIVERED"] {
        let (status, body) = app
            .patch(&format!("/api/orders/{id}/status"), &rider, json!({ "status": next }))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["status"], next);
    }

    let (status, body) = app.get(&format!("/api/orders/{id}"), &manager).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["actualDeliveryTime"].is_i64());

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/orders/{id}"), Some(&manager), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let mut kinds = Vec::new();
    while let Ok(OrderEvent { kind, .. }) = events.try_recv() {
        kinds.push(kind);
    }
    assert_eq!(kinds.first(), Some(&OrderEventKind::NewOrder));
    assert!(kinds.contains(&OrderEventKind::OrderAssigned));
    assert_eq!(kinds.last(), Some(&OrderEventKind::OrderDeleted));
    assert_eq!(kinds.len(), 8);
}

#[tokio::test]
async fn total_is_derived_from_items() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let body = json!({
        "items": [{ "name": "Pizza", "quantity": 2, "price": 10 }],
        "customer": { "name": "A", "phone": "1", "address": "B" },
        "prepTime": 10
    });
    let (status, body) = app.post("/api/orders", &manager, body).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["totalAmount"].as_f64(), Some(20.0));
    assert_eq!(body["data"]["items"][0]["price"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let id = app.create_order(&manager).await;

    let (status, body) = app
        .patch(&format!("/api/orders/{id}/status"), &manager, json!({ "status": "BOGUS" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], "E0002");

    let mut order = order_body();
    order["items"][0]["quantity"] = json!("two");
    let (status, body) = app.post("/api/orders", &manager, order).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], "E0002");

    let (status, body) = app
        .request(Method::POST, "/api/orders", Some(&manager), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn oversized_price_is_a_field_error() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let mut order = order_body();
    order["items"][0]["price"] = json!(1e12);

    let (status, body) = app.post("/api/orders", &manager, order).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["data"][0]["field"], "items[0].price");
}

#[tokio::test]
async fn invalid_order_reports_fields() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let mut body = order_body();
    body["items"] = json!([]);
    body["prepTime"] = json!(500);

    let (status, body) = app.post("/api/orders", &manager, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
    let fields: Vec<&str> = body["data"]
        .as_array()
        .expect("field list")
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert_eq!(fields, ["items", "prepTime"]);
}

#[tokio::test]
async fn illegal_transition_leaves_order_unchanged() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let id = app.create_order(&manager).await;

    let (status, body) = app
        .patch(&format!("/api/orders/{id}/status"), &manager, json!({ "status": "DELIVERED" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E1001");

    let (_, body) = app.get(&format!("/api/orders/{id}"), &manager).await;
    assert_eq!(body["data"]["status"], "PENDING");
}

#[tokio::test]
async fn ready_alias_is_accepted() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let id = app.create_order(&manager).await;
    app.patch(&format!("/api/orders/{id}/status"), &manager, json!({ "status": "PREPARING" }))
        .await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/orders/{id}/status"),
            Some(&manager),
            Some(json!({ "status": "READY" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "READY_FOR_PICKUP");
}

#[tokio::test]
async fn partner_capacity_is_three() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let (partner, _) = app.user("rider@ops.test", Role::DeliveryPartner).await;

    for _ in 0..3 {
        let id = app.ready_order(&manager).await;
        let (status, body) = app.assign(&manager, &id, partner.id).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let id = app.ready_order(&manager).await;
    let (status, body) = app.assign(&manager, &id, partner.id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E1003");
}

#[tokio::test]
async fn assignment_rules() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let (partner, rider) = app.user("rider@ops.test", Role::DeliveryPartner).await;
    let (customer, _) = app.user("eater@ops.test", Role::Customer).await;

    // not ready yet
    let pending = app.create_order(&manager).await;
    let (status, body) = app.assign(&manager, &pending, partner.id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E1001");

    let ready = app.ready_order(&manager).await;
    let (status, _) = app.assign(&manager, &ready, customer.id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.assign(&rider, &ready, partner.id).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // legacy field name
    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/orders/{ready}/assign"),
            Some(&manager),
            Some(json!({ "deliveryPartnerId": partner.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.assign(&manager, &ready, partner.id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E1002");
}

#[tokio::test]
async fn only_delivered_orders_can_be_deleted() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let id = app.create_order(&manager).await;

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/orders/{id}"), Some(&manager), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E1004");

    let (status, _) = app
        .request(Method::DELETE, "/api/orders/ORD000000000000000", Some(&manager), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partners_are_scoped_to_their_orders() {
    let app = TestApp::new().await;
    let manager = app.manager().await;
    let (mine, me) = app.user("a@ops.test", Role::DeliveryPartner).await;
    let (_, them) = app.user("b@ops.test", Role::DeliveryPartner).await;

    let assigned = app.ready_order(&manager).await;
    app.assign(&manager, &assigned, mine.id).await;
    let _unassigned = app.ready_order(&manager).await;

    let (status, body) = app.get("/api/orders", &me).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (_, body) = app.get("/api/orders?status=READY_FOR_PICKUP", &manager).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, _) = app.get(&format!("/api/orders/{assigned}"), &them).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .patch(
            &format!("/api/orders/{assigned}/status"),
            &them,
            json!({ "status": "PICKED_UP" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // partners cannot create orders
    let (status, _) = app.post("/api/orders", &them, order_body()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customers_cannot_list_orders() {
    let app = TestApp::new().await;
    let (_, customer) = app.user("eater@ops.test", Role::Customer).await;
    let (status, body) = app.get("/api/orders", &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");
}

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");

    let (status, body) = app.get("/api/orders", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3002");
}
