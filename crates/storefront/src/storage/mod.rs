//! Per-browser persisted collections.
//!
//! The cart and the favorites set live in the browser's session as JSON
//! values under fixed keys. Every mutation follows the same contract:
//!
//! 1. read the whole collection (absent or unreadable reads as empty)
//! 2. compute the new collection
//! 3. write it back in full
//! 4. publish a [`ChangeNotice`] for that collection on the [`ChangeBus`]
//!
//! Consumers never receive diffs; they re-read the whole collection when
//! notified. Two requests from the same browser mutating the same
//! collection concurrently race, and the last full write wins.

mod browser;
mod bus;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use fakeshop_core::{Cart, Favorites};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tower_sessions::Session;

pub use browser::{BROWSER_ID_KEY, BrowserId, BrowserStorage};
pub use bus::{ChangeBus, ChangeNotice, CollectionKind, Subscription};

/// Errors that can occur reading or writing persisted collections.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A collection could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key-value storage holding JSON values, one namespace per browser.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    fn load_value(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Value>, StorageError>> + Send;

    /// Replace the value under `key`.
    fn store_value(
        &self,
        key: &str,
        value: Value,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl KeyValueStore for Session {
    async fn load_value(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.get_value(key).await?)
    }

    async fn store_value(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.insert_value(key, value).await?;
        Ok(())
    }
}

/// In-memory storage for a single browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    async fn load_value(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn store_value(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A collection persisted under a fixed storage key.
pub trait Collection: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Storage key holding the JSON-encoded collection.
    const KEY: &'static str;
    /// Change notification published after each write.
    const KIND: CollectionKind;

    /// Number of entries, as shown on the navbar badge.
    fn len(&self) -> usize;
}

impl Collection for Cart {
    const KEY: &'static str = "cart";
    const KIND: CollectionKind = CollectionKind::Cart;

    fn len(&self) -> usize {
        Self::len(self)
    }
}

impl Collection for Favorites {
    const KEY: &'static str = "favorites";
    const KIND: CollectionKind = CollectionKind::Favorites;

    fn len(&self) -> usize {
        Self::len(self)
    }
}
