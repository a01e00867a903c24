//! Persistent collection store.
//!
//! Durable key/value storage for the collections the storefront keeps on the
//! customer's device (cart, wishlist, session). Values are JSON arrays.
//!
//! # Failure model
//!
//! Reads fail soft: a missing key, an unreadable file or malformed JSON all
//! load as an empty collection, so corrupted local state can never stop a
//! session from starting. Writes report errors, but callers treat them as
//! best effort and only log them.
//!
//! # Implementations
//!
//! - [`FileStore`] - one JSON file per key under a data directory
//! - [`MemoryStore`] - process-local map for tests and throwaway sessions

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Key holding the serialized cart entries.
pub const CART_KEY: &str = "bookhub-cart";

/// Key holding the serialized wishlist items.
pub const WISHLIST_KEY: &str = "bookhub-wishlist";

/// Key holding the signed-in session record.
pub const SESSION_KEY: &str = "bookhub-session";

/// Errors raised while writing to a collection store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Key contains characters that cannot be used as a storage name.
    #[error("invalid store key: {0}")]
    InvalidKey(String),
}

/// Raw string storage addressed by key.
///
/// Implementors only move strings around; [`CollectionStore::load`] and
/// [`CollectionStore::save`] handle the JSON encoding.
pub trait CollectionStore {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be written.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value stored under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Load the collection stored under `key`.
    ///
    /// Returns an empty vector if the key is absent or the stored value is not
    /// a JSON array of `T`.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T>
    where
        Self: Sized,
    {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored collection, starting empty");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Discarding malformed stored collection");
            Vec::new()
        })
    }

    /// Persist `items` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the write fails.
    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(items)?;
        self.set_raw(key, &raw)
    }
}

impl<S: CollectionStore> CollectionStore for &S {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_raw(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Save and log instead of failing; mutations must not be undone by a write error.
pub(crate) fn save_best_effort<S: CollectionStore, T: Serialize>(store: &S, key: &str, items: &[T]) {
    if let Err(e) = store.save(key, items) {
        tracing::warn!(key, error = %e, "Failed to persist collection");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: String,
        quantity: u32,
    }

    fn entry(id: &str, quantity: u32) -> Entry {
        Entry {
            id: id.to_owned(),
            quantity,
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = MemoryStore::new();
        let entries = vec![entry("a", 1), entry("b", 3)];
        store.save("cart", &entries).unwrap();
        assert_eq!(store.load::<Entry>("cart"), entries);
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = MemoryStore::new();
        assert!(store.load::<Entry>("nothing").is_empty());
    }

    #[test]
    fn test_load_malformed_json_is_empty() {
        let store = MemoryStore::new();
        store.set_raw("cart", "{not json").unwrap();
        assert!(store.load::<Entry>("cart").is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let store = MemoryStore::new();
        store.set_raw("cart", r#"{"id": "a", "quantity": 1}"#).unwrap();
        assert!(store.load::<Entry>("cart").is_empty());

        store.set_raw("cart", r#"[{"id": 7}]"#).unwrap();
        assert!(store.load::<Entry>("cart").is_empty());
    }

    #[test]
    fn test_save_replaces_previous_value() {
        let store = MemoryStore::new();
        store.save("cart", &[entry("a", 1)]).unwrap();
        store.save::<Entry>("cart", &[]).unwrap();
        assert!(store.load::<Entry>("cart").is_empty());
    }

    #[test]
    fn test_store_by_reference() {
        let store = MemoryStore::new();
        let by_ref = &store;
        by_ref.save("k", &[entry("x", 2)]).unwrap();
        assert_eq!(store.load::<Entry>("k"), vec![entry("x", 2)]);
    }
}
