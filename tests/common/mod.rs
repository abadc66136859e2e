//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use dapr_ledger::api::{self, AppState};
use dapr_ledger::state::InMemoryStateStore;
use dapr_ledger::{AccountLedger, LedgerConfig};
use serde_json::Value;
use tower::util::ServiceExt;

pub const PUBSUB: &str = "pubsub";

/// Router over a fresh in-memory store, plus the store for inspection
pub fn setup_app(config: LedgerConfig) -> (Router, Arc<InMemoryStateStore>) {
    let store = Arc::new(InMemoryStateStore::new());
    let ledger = AccountLedger::new(store.clone(), config);
    let app = api::create_app_router().with_state(AppState::new(ledger, PUBSUB));
    (app, store)
}

pub fn setup_default_app() -> (Router, Arc<InMemoryStateStore>) {
    setup_app(LedgerConfig::default())
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, "application/json", body.to_string()).await
}

pub async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: &str,
    body: impl Into<String>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.into()))
        .unwrap();
    send(app, request).await
}
