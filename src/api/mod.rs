//! API module
//!
//! HTTP endpoints, pub/sub delivery endpoints and middleware.

pub mod events;
pub mod middleware;
pub mod routes;

use axum::Router;

use crate::ledger::AccountLedger;

pub use routes::create_router;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: AccountLedger,
    /// Pub/sub component advertised in `/dapr/subscribe`
    pub pubsub_name: String,
}

impl AppState {
    pub fn new(ledger: AccountLedger, pubsub_name: impl Into<String>) -> Self {
        Self {
            ledger,
            pubsub_name: pubsub_name.into(),
        }
    }
}

/// Account routes plus pub/sub routes, ready for `with_state`
pub fn create_app_router() -> Router<AppState> {
    create_router().merge(events::create_router())
}
