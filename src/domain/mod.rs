//! Domain module
//!
//! Core domain types and validation rules.

pub mod account;
pub mod amount;
pub mod error;

pub use account::{Account, Transaction};
pub use amount::{Amount, AmountError};
pub use error::DomainError;
