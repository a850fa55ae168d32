//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::{KeyValueStore, StoreError};

/// Process-local store backed by a `HashMap`.
///
/// Clones share the same map, so a clone handed to a cart manager and one
/// kept by a test observe the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    entries: RwLock<HashMap<String, String>>,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Arc::new(MemoryStoreInner {
                entries: RwLock::new(map),
                reject_writes: AtomicBool::new(false),
            }),
        }
    }

    /// Make every subsequent `set`/`remove` fail, as a full quota would.
    pub fn reject_writes(&self, reject: bool) {
        self.inner.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Read a value without going through the async trait.
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.inner
            .entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.inner.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("quota exceeded".to_string()));
        }
        Ok(())
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.inner.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut entries = self.inner.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut entries = self.inner.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("carrito").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("usuario", "Ana".to_string()).await.unwrap();
        assert_eq!(store.get("usuario").await.unwrap().as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.snapshot("k").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::with_entries([("a", "1")]);
        store.remove("b").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.snapshot("a"), None);
    }

    #[tokio::test]
    async fn test_rejected_writes_leave_state_untouched() {
        let store = MemoryStore::with_entries([("carrito", "[]")]);
        store.reject_writes(true);

        let result = store.set("carrito", "changed".to_string()).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(store.remove("carrito").await.is_err());
        assert_eq!(store.snapshot("carrito").as_deref(), Some("[]"));

        store.reject_writes(false);
        store.set("carrito", "changed".to_string()).await.unwrap();
    }
}
