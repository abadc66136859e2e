//! Account and Transaction
//!
//! The persisted account record and the inbound balance-change request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, DomainError};

/// Account record as persisted in the state store.
///
/// Serialized as `{"id": ..., "balance": ...}`. Balance is signed: whether it
/// may go below zero is a ledger policy, not a property of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub balance: Decimal,
}

impl Account {
    /// A fresh account with a zero balance
    pub fn open(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            balance: Decimal::ZERO,
        }
    }

    /// Return the account with `delta` added to its balance
    pub fn with_delta(mut self, delta: Decimal) -> Result<Self, DomainError> {
        self.balance = self
            .balance
            .checked_add(delta)
            .ok_or(DomainError::BalanceOverflow)?;
        Ok(self)
    }

    pub fn is_overdrawn(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}

/// Balance change request, decoded from an HTTP body or event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }

    /// Validate the request before it touches the store.
    ///
    /// # Errors
    /// - `DomainError::InvalidAccountId` if the id is empty or blank
    /// - `DomainError::InvalidAmount` if the amount is not a valid [`Amount`]
    pub fn validate(&self) -> Result<Amount, DomainError> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidAccountId(self.id.clone()));
        }
        Ok(Amount::new(self.amount)?)
    }
}
