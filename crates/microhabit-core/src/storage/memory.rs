//! In-memory persistence, used by tests and embedders that persist elsewhere.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::Persistence;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, serde_json::Value>>,
    read_only: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as a full browser quota would.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.read_only.get() {
            Err(StorageError::Unavailable("storage is read-only".into()))
        } else {
            Ok(())
        }
    }
}

impl Persistence for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        self.check_writable()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_set_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get("k").unwrap().is_none());
        storage.set("k", &json!({"a": 1})).unwrap();
        assert_eq!(storage.get("k").unwrap(), Some(json!({"a": 1})));
        storage.remove("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn read_only_rejects_writes_but_keeps_data() {
        let storage = MemoryStorage::new();
        storage.set("k", &json!(1)).unwrap();
        storage.set_read_only(true);
        assert!(matches!(
            storage.set("k", &json!(2)),
            Err(StorageError::Unavailable(_))
        ));
        assert_eq!(storage.get("k").unwrap(), Some(json!(1)));
    }
}
