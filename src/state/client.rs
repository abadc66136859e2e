//! State Store Client
//!
//! The narrow interface the ledger uses to reach persistent storage.

use async_trait::async_trait;

use crate::domain::Account;

use super::{StateEntry, StateStoreError};

/// Conditional key/value access to an external state store.
///
/// `save` must write `entry.value` under `entry.key` only if the store's
/// current token for that key still equals `entry.etag`, and must report
/// `StateStoreError::Conflict` otherwise. A save is atomic: on any error
/// nothing has been written.
#[async_trait]
pub trait StateStoreClient: Send + Sync {
    /// Read `key` from `store` together with its current token
    async fn fetch(&self, store: &str, key: &str) -> Result<StateEntry<Account>, StateStoreError>;

    /// Write `entry` iff its token is still current
    async fn save(&self, store: &str, entry: &StateEntry<Account>) -> Result<(), StateStoreError>;
}
