//! Key-value persistence for client-scoped state.
//!
//! The storefront keeps the cart and the logged-in user under well-known
//! string keys, the same way a browser keeps them in `localStorage`. Values
//! are opaque strings; schemas live in [`crate::models`].
//!
//! # Implementations
//!
//! - [`FileStore`] - One JSON object on disk, rewritten atomically on change
//! - [`MemoryStore`] - In-process map, used by tests and demos
//!
//! There is no locking across processes: two writers racing on the same file
//! resolve as last-writer-wins.

mod file;
mod memory;

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors that can occur when reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but isn't a JSON object of strings.
    #[error("Corrupt store at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the write (quota, read-only mode, poisoned lock).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// String key-value store scoped to a single client.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<T: KeyValueStore> KeyValueStore for &T {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Store unavailable: quota exceeded");

        let err = StoreError::Io {
            path: PathBuf::from("/tmp/x.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "I/O error on /tmp/x.json: denied");
    }
}
