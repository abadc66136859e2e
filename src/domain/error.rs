//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::AmountError;

/// Validation failures for inbound transactions and balance arithmetic.
///
/// These are raised before any store interaction and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Account id is empty or blank
    #[error("Invalid account id: {0:?}")]
    InvalidAccountId(String),

    /// Amount is zero, negative, too precise or too large
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Balance arithmetic left the representable range
    #[error("Balance overflow")]
    BalanceOverflow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_invalid_amount_message() {
        let err = DomainError::from(AmountError::NotPositive(Decimal::ZERO));
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_invalid_account_id_message() {
        let err = DomainError::InvalidAccountId(String::new());
        assert_eq!(err.to_string(), "Invalid account id: \"\"");
    }
}
