//! Shared harness: the real router over an in-memory database

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use ops_server::db::DbService;
use ops_server::db::repository::user::{self, NewUser};
use ops_server::{Config, ServerState, api};
use serde_json::{Value, json};
use shared::models::{Role, User};
use tower::ServiceExt;

pub struct TestApp {
    pub state: ServerState,
    app: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::with_overrides("sqlite::memory:", 0);
        let db = DbService::in_memory().await.expect("in-memory database");
        let state = ServerState::new(config, db);
        let app = api::build_app(&state).with_state(state.clone());
        Self { state, app }
    }

    /// Insert a user directly and mint a token for them
    pub async fn user(&self, email: &str, role: Role) -> (User, String) {
        let created = user::create(
            self.state.pool(),
            NewUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password_hash: "not-a-real-hash".into(),
                phone: "9000000000".into(),
                role,
            },
        )
        .await
        .expect("create user");
        let token = self
            .state
            .get_jwt_service()
            .generate_token(&created)
            .expect("token");
        (created, token)
    }

    pub async fn manager(&self) -> String {
        self.user("manager@ops.test", Role::RestaurantManager).await.1
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(token), Some(body))
            .await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body))
            .await
    }

    /// Create an order and return its id
    pub async fn create_order(&self, manager: &str) -> String {
        let (status, body) = self.post("/api/orders", manager, order_body()).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().expect("order id").to_string()
    }

    /// Create an order and move it to READY_FOR_PICKUP
    pub async fn ready_order(&self, manager: &str) -> String {
        let id = self.create_order(manager).await;
        for status in ["PREPARING", "READY_FOR_PICKUP"] {
            let (code, body) = self
                .patch(&format!("/api/orders/{id}/status"), manager, json!({ "status": status }))
                .await;
            assert_eq!(code, StatusCode::OK, "{body}");
        }
        id
    }

    pub async fn assign(&self, manager: &str, order_id: &str, partner_id: i64) -> (StatusCode, Value) {
        self.post(
            &format!("/api/orders/{order_id}/assign"),
            manager,
            json!({ "partnerId": partner_id }),
        )
        .await
    }
}

pub fn order_body() -> Value {
    json!({
        "items": [{ "name": "Paneer Tikka", "quantity": 2, "price": 180.5 }],
        "customer": { "name": "Kiran", "phone": "9811111111", "address": "22 Residency Road" },
        "prepTime": 15
    })
}
