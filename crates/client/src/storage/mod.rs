//! Persisted key-value storage.
//!
//! The client never touches a global store. Everything it mirrors locally
//! (session, caches, offline queues) goes through an injected
//! [`KeyValueStore`], so tests and multiple sessions stay isolated.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - process-local map, lost on exit
//! - [`FileStore`] - JSON object on disk, written through on every change
//!
//! Values are JSON strings. Typed access goes through [`KeyValueStoreExt`],
//! which purges entries that no longer parse instead of failing.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use thrift_core::UserId;

/// Storage keys shared with the browser build of the storefront.
pub mod keys {
    use super::UserId;

    /// Bearer token of the current session.
    pub const AUTH_TOKEN: &str = "authToken";

    /// JSON-encoded current user.
    pub const USER: &str = "user";

    /// Last successful product listing.
    pub const CACHED_PRODUCTS: &str = "cachedProducts";

    /// Locale preferences mirror.
    pub const USER_SETTINGS: &str = "userSettings";

    /// Notification preferences mirror.
    pub const NOTIFICATION_SETTINGS: &str = "notificationSettings";

    /// Support tickets recorded while the backend was unreachable.
    pub const PENDING_SUPPORT_TICKETS: &str = "pendingSupportTickets";

    /// Per-user wishlist mirror.
    #[must_use]
    pub fn wishlist(user_id: &UserId) -> String {
        format!("wishlist_{user_id}")
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded, or the backing file is not a JSON object.
    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Synchronous string key-value store.
///
/// Accessed from a single execution context; concurrent writers to the same
/// key race and the last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Typed JSON access on top of any [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a JSON value.
    ///
    /// Missing keys and the literal strings `null`/`undefined` read as `None`.
    /// A value that fails to decode is treated as absent and purged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only if the backend itself fails.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        if raw.is_empty() || raw == "null" || raw == "undefined" {
            return Ok(None);
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Malformed stored value, purging");
                self.remove(key)?;
                Ok(None)
            }
        }
    }

    /// Encode and write a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
