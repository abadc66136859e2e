//! dapr-ledger Library
//!
//! Account ledger with optimistic-concurrency updates over a keyed state
//! store. Re-exports modules for the binary and for integration testing.

pub mod api;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod state;

mod error;

pub use config::{Config, ConfigError, StateBackend};
pub use domain::{Account, Amount, AmountError, DomainError, Transaction};
pub use error::{AppError, AppResult, ErrorResponse};
pub use ledger::{AccountLedger, LedgerConfig, LedgerError, RetryPolicy};
pub use state::{StateEntry, StateStoreClient, StateStoreError};
