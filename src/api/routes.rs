//! API Routes
//!
//! HTTP endpoint definitions for account queries and balance changes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Uri,
    routing::{get, post},
    Json, Router,
};

use crate::domain::{Account, Transaction};
use crate::error::AppResult;

use super::AppState;

// =========================================================================
// API Router
// =========================================================================

/// Create the account router
///
/// `/deposit` and `/withdraw` also answer GET as account lookups, so
/// accounts with those ids stay readable.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/deposit", post(deposit).get(get_account_at_path))
        .route("/withdraw", post(withdraw).get(get_account_at_path))
        .route("/:account", get(get_account))
}

// =========================================================================
// GET /:account
// =========================================================================

/// Get the account with the given id
async fn get_account(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> AppResult<Json<Account>> {
    let account = state.ledger.get(&account).await?;
    Ok(Json(account))
}

/// Account lookup on a static route, keyed by the path itself
async fn get_account_at_path(
    State(state): State<AppState>,
    uri: Uri,
) -> AppResult<Json<Account>> {
    let account = state.ledger.get(uri.path().trim_start_matches('/')).await?;
    Ok(Json(account))
}

// =========================================================================
// POST /deposit
// =========================================================================

/// Deposit into an account, opening it on first use
async fn deposit(
    State(state): State<AppState>,
    payload: Result<Json<Transaction>, JsonRejection>,
) -> AppResult<Json<Account>> {
    let Json(transaction) = payload?;

    let account = state.ledger.deposit(&transaction).await?;

    tracing::info!(
        account_id = %account.id,
        amount = %transaction.amount,
        balance = %account.balance,
        "Deposit applied"
    );

    Ok(Json(account))
}

// =========================================================================
// POST /withdraw
// =========================================================================

/// Withdraw from an existing account
async fn withdraw(
    State(state): State<AppState>,
    payload: Result<Json<Transaction>, JsonRejection>,
) -> AppResult<Json<Account>> {
    let Json(transaction) = payload?;

    let account = state.ledger.withdraw(&transaction).await?;

    tracing::info!(
        account_id = %account.id,
        amount = %transaction.amount,
        balance = %account.balance,
        "Withdrawal applied"
    );

    Ok(Json(account))
}
