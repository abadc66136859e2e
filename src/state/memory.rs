//! In-memory state store for development and tests
//!
//! Honors the same conditional-write contract as the sidecar-backed store.
//! Values are kept serialized so every fetch returns an independent copy.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::Account;

use super::{ETag, StateEntry, StateStoreClient, StateStoreError};

#[derive(Debug, Clone)]
struct StoredValue {
    data: Vec<u8>,
    version: u64,
}

/// In-memory state store keyed by `(store, key)`
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    data: Mutex<HashMap<(String, String), StoredValue>>,
    saves: AtomicU64,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful conditional saves
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }
}

#[async_trait]
impl StateStoreClient for InMemoryStateStore {
    async fn fetch(&self, store: &str, key: &str) -> Result<StateEntry<Account>, StateStoreError> {
        let stored = self
            .data
            .lock()
            .get(&(store.to_string(), key.to_string()))
            .cloned();

        match stored {
            Some(stored) => {
                let account: Account = serde_json::from_slice(&stored.data)?;
                Ok(StateEntry::present(
                    key,
                    account,
                    ETag::new(stored.version.to_string()),
                ))
            }
            None => Ok(StateEntry::absent(key)),
        }
    }

    async fn save(&self, store: &str, entry: &StateEntry<Account>) -> Result<(), StateStoreError> {
        let value = entry
            .value
            .as_ref()
            .ok_or_else(|| StateStoreError::EmptyValue(entry.key.clone()))?;
        let data = serde_json::to_vec(value)?;

        let mut map = self.data.lock();
        let slot = (store.to_string(), entry.key.clone());
        let current = map.get(&slot).map(|v| v.version);
        let expected = entry.etag.as_ref().map(|tag| tag.as_str().to_string());

        if current.map(|v| v.to_string()) != expected {
            return Err(StateStoreError::Conflict {
                key: entry.key.clone(),
            });
        }

        let version = current.map_or(1, |v| v + 1);
        map.insert(slot, StoredValue { data, version });
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const STORE: &str = "statestore";

    impl InMemoryStateStore {
        /// Seed `key` with `account`, bypassing the token check
        fn insert(&self, store: &str, key: &str, account: &Account) {
            let data = serde_json::to_vec(account).unwrap();
            let mut map = self.data.lock();
            let slot = (store.to_string(), key.to_string());
            let version = map.get(&slot).map_or(1, |v| v.version + 1);
            map.insert(slot, StoredValue { data, version });
        }
    }

    #[tokio::test]
    async fn test_fetch_absent() {
        let store = InMemoryStateStore::new();
        let entry = store.fetch(STORE, "A1").await.unwrap();
        assert!(entry.value.is_none());
        assert!(entry.etag.is_none());
    }

    #[tokio::test]
    async fn test_create_then_update() {
        let store = InMemoryStateStore::new();

        let entry = store.fetch(STORE, "A1").await.unwrap();
        store
            .save(STORE, &entry.with_value(Account::open("A1")))
            .await
            .unwrap();

        let entry = store.fetch(STORE, "A1").await.unwrap();
        assert_eq!(entry.etag, Some(ETag::new("1")));

        let updated = Account::open("A1").with_delta(dec!(5)).unwrap();
        store.save(STORE, &entry.with_value(updated)).await.unwrap();

        let entry = store.fetch(STORE, "A1").await.unwrap();
        assert_eq!(entry.value.unwrap().balance, dec!(5));
        assert_eq!(entry.etag, Some(ETag::new("2")));
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_token_conflicts() {
        let store = InMemoryStateStore::new();
        store.insert(STORE, "A1", &Account::open("A1"));

        let first = store.fetch(STORE, "A1").await.unwrap();
        let second = store.fetch(STORE, "A1").await.unwrap();

        store
            .save(STORE, &first.with_value(Account::open("A1")))
            .await
            .unwrap();
        let err = store
            .save(STORE, &second.with_value(Account::open("A1")))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_create_races_conflict() {
        let store = InMemoryStateStore::new();
        let a = store.fetch(STORE, "A1").await.unwrap();
        let b = store.fetch(STORE, "A1").await.unwrap();

        store.save(STORE, &a.with_value(Account::open("A1"))).await.unwrap();
        let err = store
            .save(STORE, &b.with_value(Account::open("A1")))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_save_without_value_rejected() {
        let store = InMemoryStateStore::new();
        let err = store
            .save(STORE, &StateEntry::absent("A1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StateStoreError::EmptyValue(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        let store = InMemoryStateStore::new();
        store.insert("one", "A1", &Account::open("A1"));
        assert!(store.fetch("two", "A1").await.unwrap().value.is_none());
        assert!(store.fetch("one", "A1").await.unwrap().value.is_some());
    }
}
