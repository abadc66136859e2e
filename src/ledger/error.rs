//! Ledger Errors

use rust_decimal::Decimal;

use crate::domain::DomainError;
use crate::state::StateStoreError;

/// Errors returned by [`AccountLedger`](super::AccountLedger) operations
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The operation needs an existing account
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Every save attempt lost the optimistic concurrency race
    #[error("Concurrent modification of account {account_id}: gave up after {attempts} attempts")]
    Conflict { account_id: String, attempts: u32 },

    /// The state store could not be reached or failed
    #[error("State store unavailable: {0}")]
    StoreUnavailable(#[source] StateStoreError),

    /// Malformed transaction, rejected before any store interaction
    #[error(transparent)]
    InvalidInput(#[from] DomainError),

    /// Withdrawal would overdraw an account while overdrafts are disabled
    #[error("Insufficient funds in account {account_id}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account_id: String,
        balance: Decimal,
        requested: Decimal,
    },
}

impl LedgerError {
    /// Check if a later redelivery of the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::Conflict { .. } | LedgerError::StoreUnavailable(_)
        )
    }
}
