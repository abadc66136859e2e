//! HTTP API Integration Tests

use axum::http::StatusCode;
use dapr_ledger::{LedgerConfig, RetryPolicy};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_deposit_withdraw_get_e2e() {
    let (app, store) = common::setup_default_app();

    // 1. First deposit opens the account
    let (status, body) = common::post_json(&app, "/deposit", json!({"id": "A1", "amount": 100})).await;
    assert_eq!(status, StatusCode::OK, "Deposit failed: {}", body);
    assert_eq!(body, json!({"id": "A1", "balance": "100"}));

    // 2. Withdraw part of it
    let (status, body) = common::post_json(&app, "/withdraw", json!({"id": "A1", "amount": "40.5"})).await;
    assert_eq!(status, StatusCode::OK, "Withdraw failed: {}", body);
    assert_eq!(body["balance"], "59.5");

    // 3. Read it back
    let (status, body) = common::get(&app, "/A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "A1", "balance": "59.5"}));

    assert_eq!(store.save_count(), 2);
}

#[tokio::test]
async fn test_get_unknown_account_is_404() {
    let (app, _store) = common::setup_default_app();

    let (status, body) = common::get(&app, "/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "account_not_found");
    assert_eq!(body["details"], "missing");
}

#[tokio::test]
async fn test_withdraw_unknown_account_is_404() {
    let (app, store) = common::setup_default_app();

    let (status, body) = common::post_json(&app, "/withdraw", json!({"id": "ghost", "amount": 5})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "account_not_found");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_invalid_payloads_are_400() {
    let (app, store) = common::setup_default_app();

    let (status, body) = common::post_json(&app, "/deposit", json!({"id": "A1", "amount": "ten"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");

    let (status, body) = common::post_json(&app, "/deposit", json!({"id": "A1", "amount": -5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_input");

    let (status, _) = common::post_json(&app, "/deposit", json!({"amount": 5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::post_raw(&app, "/deposit", "application/json", "{").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_overdraft_policy_is_configurable() {
    let (app, _store) = common::setup_app(LedgerConfig {
        allow_negative_balance: false,
        ..LedgerConfig::default()
    });

    common::post_json(&app, "/deposit", json!({"id": "A1", "amount": 10})).await;
    let (status, body) = common::post_json(&app, "/withdraw", json!({"id": "A1", "amount": 11})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], "insufficient_funds");

    let (_, body) = common::get(&app, "/A1").await;
    assert_eq!(body["balance"], "10");
}

#[tokio::test]
async fn test_overdraft_allowed_by_default() {
    let (app, _store) = common::setup_default_app();

    common::post_json(&app, "/deposit", json!({"id": "A1", "amount": 10})).await;
    let (status, body) = common::post_json(&app, "/withdraw", json!({"id": "A1", "amount": 25})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "-15");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_http_deposits() {
    let (app, store) = common::setup_app(LedgerConfig {
        retry: RetryPolicy::new(1000, std::time::Duration::ZERO),
        ..LedgerConfig::default()
    });

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                common::post_json(&app, "/deposit", json!({"id": "hot", "amount": 1})).await
            })
        })
        .collect();

    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = common::get(&app, "/hot").await;
    assert_eq!(body["balance"], "16");
    assert_eq!(store.save_count(), 16);
}

#[tokio::test]
async fn test_accounts_named_like_routes_are_readable() {
    let (app, _store) = common::setup_default_app();

    for id in ["deposit", "withdraw"] {
        let (status, _) = common::get(&app, &format!("/{}", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = common::post_json(&app, "/deposit", json!({"id": id, "amount": 5})).await;
        assert_eq!(status, StatusCode::OK, "Deposit failed: {}", body);

        let (status, body) = common::get(&app, &format!("/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": id, "balance": "5"}));
    }
}
