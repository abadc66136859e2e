//! State Entry
//!
//! One fetched snapshot of a keyed record together with its concurrency token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque version marker handed out by the state store.
///
/// The ledger never interprets an ETag; it only hands it back on save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of `key` as read from the store.
///
/// `value` is `None` when the key does not exist. `etag` is `None` for an
/// absent key; saving such an entry only succeeds while the key is still
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEntry<T> {
    pub key: String,
    pub value: Option<T>,
    pub etag: Option<ETag>,
}

impl<T> StateEntry<T> {
    /// Entry for a key that does not exist yet
    pub fn absent(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            etag: None,
        }
    }

    /// Entry for a key read at version `etag`
    pub fn present(key: impl Into<String>, value: T, etag: ETag) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
            etag: Some(etag),
        }
    }

    /// Replace the value, keeping the key and the token that was read
    pub fn with_value(self, value: T) -> Self {
        Self {
            value: Some(value),
            ..self
        }
    }
}
