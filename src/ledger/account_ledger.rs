//! Account Ledger
//!
//! Applies balance changes with a read-modify-write cycle against the state
//! store. Each cycle fetches the account with its ETag, mutates it in memory
//! and saves it conditioned on that ETag; a lost race restarts the cycle.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::{Account, Transaction};
use crate::state::{StateEntry, StateStoreClient, StateStoreError};

use super::{LedgerError, RetryPolicy};

/// Default state store component name
pub const DEFAULT_STORE_NAME: &str = "statestore";

/// What to do when the account does not exist yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAccount {
    /// Start from a zero balance
    Create,
    /// Fail with `LedgerError::NotFound`
    Reject,
}

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// State store component holding the accounts
    pub store_name: String,

    /// Conflict retry policy
    pub retry: RetryPolicy,

    /// Whether a withdrawal may take the balance below zero
    pub allow_negative_balance: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            retry: RetryPolicy::default(),
            allow_negative_balance: true,
        }
    }
}

/// Optimistic-concurrency account ledger.
///
/// Holds no account state of its own: every call re-reads the store, and
/// concurrent calls on the same account are serialized only by the store's
/// conditional save.
#[derive(Clone)]
pub struct AccountLedger {
    client: Arc<dyn StateStoreClient>,
    config: LedgerConfig,
}

impl AccountLedger {
    pub fn new(client: Arc<dyn StateStoreClient>, config: LedgerConfig) -> Self {
        Self { client, config }
    }

    /// Get an account by id
    pub async fn get(&self, account_id: &str) -> Result<Account, LedgerError> {
        let entry = self.fetch(account_id).await?;
        entry
            .value
            .ok_or_else(|| LedgerError::NotFound(account_id.to_string()))
    }

    /// Credit `transaction.amount`, opening the account if needed
    pub async fn deposit(&self, transaction: &Transaction) -> Result<Account, LedgerError> {
        let amount = transaction.validate()?;
        self.apply_delta(&transaction.id, amount.as_credit(), MissingAccount::Create)
            .await
    }

    /// Debit `transaction.amount` from an existing account
    pub async fn withdraw(&self, transaction: &Transaction) -> Result<Account, LedgerError> {
        let amount = transaction.validate()?;
        self.apply_delta(&transaction.id, amount.as_debit(), MissingAccount::Reject)
            .await
    }

    /// Add `delta` to the balance of `account_id`.
    ///
    /// Performs one fetch per attempt and at most `retry.max_attempts()`
    /// saves. Conflicts are retried; store failures are returned at once.
    pub async fn apply_delta(
        &self,
        account_id: &str,
        delta: Decimal,
        missing: MissingAccount,
    ) -> Result<Account, LedgerError> {
        let max_attempts = self.config.retry.max_attempts();

        for attempt in 1..=max_attempts {
            let entry = self.fetch(account_id).await?;

            let current = match (entry.value.clone(), missing) {
                (Some(account), _) => account,
                (None, MissingAccount::Create) => Account::open(account_id),
                (None, MissingAccount::Reject) => {
                    return Err(LedgerError::NotFound(account_id.to_string()));
                }
            };

            let updated = current.clone().with_delta(delta)?;
            if updated.is_overdrawn() && delta < Decimal::ZERO && !self.config.allow_negative_balance {
                return Err(LedgerError::InsufficientFunds {
                    account_id: account_id.to_string(),
                    balance: current.balance,
                    requested: -delta,
                });
            }

            tracing::debug!(
                account_id = %account_id,
                attempt,
                etag = ?entry.etag,
                balance = %updated.balance,
                "Saving account"
            );

            let entry = entry.with_value(updated.clone());
            match self.client.save(&self.config.store_name, &entry).await {
                Ok(()) => return Ok(updated),
                Err(e) if e.is_conflict() && attempt < max_attempts => {
                    tracing::warn!(
                        account_id = %account_id,
                        "Concurrency conflict, retrying (attempt {}/{})",
                        attempt,
                        max_attempts
                    );
                    let delay = self.config.retry.delay_after(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) if e.is_conflict() => {
                    tracing::warn!(
                        account_id = %account_id,
                        attempts = max_attempts,
                        "Concurrency conflict, retries exhausted"
                    );
                }
                Err(e) => return Err(self.unavailable(account_id, e)),
            }
        }

        Err(LedgerError::Conflict {
            account_id: account_id.to_string(),
            attempts: max_attempts,
        })
    }

    async fn fetch(&self, account_id: &str) -> Result<StateEntry<Account>, LedgerError> {
        self.client
            .fetch(&self.config.store_name, account_id)
            .await
            .map_err(|e| self.unavailable(account_id, e))
    }

    fn unavailable(&self, account_id: &str, error: StateStoreError) -> LedgerError {
        tracing::error!(
            account_id = %account_id,
            store = %self.config.store_name,
            "State store error: {}",
            error
        );
        LedgerError::StoreUnavailable(error)
    }
}
