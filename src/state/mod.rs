//! State module
//!
//! Versioned key/value access to the external state store.
//! The ledger depends only on `StateStoreClient`; the sidecar client and the
//! in-memory store are the two implementations wired up by the binary.

mod client;
mod dapr;
mod entry;
mod error;
mod memory;

pub use client::StateStoreClient;
pub use dapr::DaprStateClient;
pub use entry::{ETag, StateEntry};
pub use error::StateStoreError;
pub use memory::InMemoryStateStore;
