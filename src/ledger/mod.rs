//! Ledger module
//!
//! Deposit, withdraw and query operations over versioned account entries.

mod account_ledger;
mod error;
mod retry;

pub use account_ledger::{AccountLedger, LedgerConfig, MissingAccount, DEFAULT_STORE_NAME};
pub use error::LedgerError;
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
