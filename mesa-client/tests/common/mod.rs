// Stub backend helpers shared by the integration tests

#![allow(dead_code)]

use axum::Json;
use axum::http::StatusCode;
use mesa_client::{OneshotHttpClient, Session};
use serde_json::{Value, json};
use shared::models::Order;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request counter shared with route handlers
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

pub fn fail(status: StatusCode, code: &str, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "success": false,
            "error": { "code": code, "message": message }
        })),
    )
}

pub fn order_json(id: &str) -> Value {
    json!({
        "id": id,
        "orderNumber": format!("N-{}", id),
        "tableId": "t1",
        "tableNumber": "4",
        "status": "active",
        "items": [
            {"id": "a", "menuItemId": "m1", "name": "Ramen", "quantity": 2, "price": 10.0},
            {"id": "b", "menuItemId": "m2", "name": "Gyoza", "quantity": 1, "price": 5.0}
        ]
    })
}

pub fn sample_order(id: &str) -> Order {
    serde_json::from_value(order_json(id)).unwrap()
}

pub fn client(router: axum::Router) -> Arc<OneshotHttpClient> {
    Arc::new(OneshotHttpClient::new(router, Session::with_token("test-token")))
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
