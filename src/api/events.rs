//! Pub/Sub Event Endpoints
//!
//! Programmatic Dapr subscription and the delivery routes for the
//! `deposit` and `withdraw` topics. Deliveries are at-least-once; the
//! response status tells the broker whether to redeliver.

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::Transaction;
use crate::ledger::LedgerError;

use super::AppState;

/// Topics this service consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Deposit,
    Withdraw,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Deposit, Topic::Withdraw];

    pub fn name(&self) -> &'static str {
        match self {
            Topic::Deposit => "deposit",
            Topic::Withdraw => "withdraw",
        }
    }

    /// Route the broker delivers this topic to
    pub fn route(&self) -> &'static str {
        match self {
            Topic::Deposit => "/events/deposit",
            Topic::Withdraw => "/events/withdraw",
        }
    }
}

/// Entry of the `/dapr/subscribe` response
#[derive(Debug, Serialize)]
pub struct Subscription {
    pub pubsubname: String,
    pub topic: &'static str,
    pub route: &'static str,
}

/// What the broker should do with a delivered event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeliveryStatus {
    /// Processed
    Success,
    /// Redeliver later
    Retry,
    /// Discard, redelivery cannot succeed
    Drop,
}

#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub status: DeliveryStatus,
}

/// Create the pub/sub router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/dapr/subscribe", get(subscribe))
        .route(Topic::Deposit.route(), post(deliver_deposit))
        .route(Topic::Withdraw.route(), post(deliver_withdraw))
}

/// List the topics this service wants delivered
async fn subscribe(State(state): State<AppState>) -> Json<Vec<Subscription>> {
    let subscriptions = Topic::ALL
        .iter()
        .map(|topic| Subscription {
            pubsubname: state.pubsub_name.clone(),
            topic: topic.name(),
            route: topic.route(),
        })
        .collect();

    Json(subscriptions)
}

async fn deliver_deposit(State(state): State<AppState>, body: Bytes) -> Json<DeliveryResponse> {
    Json(deliver(&state, Topic::Deposit, &body).await)
}

async fn deliver_withdraw(State(state): State<AppState>, body: Bytes) -> Json<DeliveryResponse> {
    Json(deliver(&state, Topic::Withdraw, &body).await)
}

async fn deliver(state: &AppState, topic: Topic, body: &[u8]) -> DeliveryResponse {
    let transaction = match decode_transaction(body) {
        Ok(transaction) => transaction,
        Err(e) => {
            tracing::warn!(topic = topic.name(), "Dropping undecodable event: {}", e);
            return DeliveryResponse {
                status: DeliveryStatus::Drop,
            };
        }
    };

    let result = match topic {
        Topic::Deposit => state.ledger.deposit(&transaction).await,
        Topic::Withdraw => state.ledger.withdraw(&transaction).await,
    };

    let status = match result {
        Ok(account) => {
            tracing::info!(
                topic = topic.name(),
                account_id = %account.id,
                balance = %account.balance,
                "Event applied"
            );
            DeliveryStatus::Success
        }
        Err(e) => delivery_status(topic, &transaction, &e),
    };

    DeliveryResponse { status }
}

fn delivery_status(topic: Topic, transaction: &Transaction, error: &LedgerError) -> DeliveryStatus {
    if error.is_retryable() {
        tracing::warn!(
            topic = topic.name(),
            account_id = %transaction.id,
            "Event failed, requesting redelivery: {}",
            error
        );
        DeliveryStatus::Retry
    } else {
        tracing::warn!(
            topic = topic.name(),
            account_id = %transaction.id,
            "Event rejected: {}",
            error
        );
        DeliveryStatus::Drop
    }
}

/// Decode a transaction from a CloudEvent envelope or a bare JSON payload.
///
/// The envelope's `data` may be an embedded object or a JSON-encoded string.
pub fn decode_transaction(body: &[u8]) -> Result<Transaction, serde_json::Error> {
    let value: Value = serde_json::from_slice(body)?;

    match value.get("data") {
        Some(Value::String(encoded)) => serde_json::from_str(encoded),
        Some(data) => serde_json::from_value(data.clone()),
        None => serde_json::from_value(value),
    }
}
