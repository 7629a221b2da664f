//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::KeyValueStore;
use crate::error::StoreError;

/// HashMap-backed store. Clones share the same map.
///
/// `fail_writes` makes every write return an error, for exercising the
/// save-failure path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.extend(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("streak", "2".to_string()).await.unwrap();
        assert_eq!(other.get("streak").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_failed_writes_leave_values_untouched() {
        let store = MemoryStore::new();
        store.set("streak", "2".to_string()).await.unwrap();
        store.fail_writes(true);
        assert!(store.set("streak", "3".to_string()).await.is_err());
        assert!(store
            .set_many(vec![("streak".to_string(), "3".to_string())])
            .await
            .is_err());
        assert_eq!(store.get("streak").await.unwrap().as_deref(), Some("2"));
    }
}
