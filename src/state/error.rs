//! State Store Errors
//!
//! Error types for state store operations.

/// Errors that can occur talking to the state store
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    /// Conditional write rejected: the key changed since it was read
    #[error("ETag mismatch for key {key}")]
    Conflict { key: String },

    /// Connectivity, timeout or store-side failure
    #[error("State store transport error: {0}")]
    Transport(String),

    /// Value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Save attempted with no value to write
    #[error("Nothing to save for key {0}")]
    EmptyValue(String),
}

impl StateStoreError {
    /// Check if this error is an optimistic concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StateStoreError::Conflict { .. })
    }
}

impl From<reqwest::Error> for StateStoreError {
    fn from(err: reqwest::Error) -> Self {
        StateStoreError::Transport(err.to_string())
    }
}
