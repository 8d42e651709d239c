use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory key-value store
///
/// Readers share the lock, writers take it exclusively. Every mutation is a
/// single `HashMap` call, so a guard poisoned by a panicking holder still
/// protects a consistent map and is recovered rather than propagated.
pub struct Store {
    data: RwLock<HashMap<String, String>>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set a key to the given value, overwriting any previous value
    pub fn set(&self, key: String, value: String) {
        self.write().insert(key, value);
    }

    /// Get the value for a key
    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// Copy of the whole mapping at the moment of the call
    pub fn get_all(&self) -> HashMap<String, String> {
        self.read().clone()
    }

    /// Remove a key, returning whether it was present
    pub fn delete(&self, key: &str) -> bool {
        self.write().remove(key).is_some()
    }

    /// Number of keys currently stored
    pub fn size(&self) -> usize {
        self.read().len()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
