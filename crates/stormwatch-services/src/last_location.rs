//! The most recently viewed city, restored on the next start.

use std::sync::Arc;

use crate::kv::{KeyValueStore, StorageResult};

/// Storage key of the last viewed city
pub const LAST_CITY_KEY: &str = "lastCity";

#[derive(Clone)]
pub struct LastLocationStore {
    store: Arc<dyn KeyValueStore>,
}

impl LastLocationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last viewed city; unset, blank or unreadable values read as `None`.
    pub fn get(&self) -> Option<String> {
        match self.store.get(LAST_CITY_KEY) {
            Ok(Some(city)) if !city.trim().is_empty() => Some(city),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Ignoring stored last city: {}", e);
                None
            }
        }
    }

    /// # Errors
    /// Returns `StorageError::Write` if the value cannot be saved.
    pub fn set(&self, city: &str) -> StorageResult<()> {
        self.store.set(LAST_CITY_KEY, city)
    }
}
