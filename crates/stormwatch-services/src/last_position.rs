//! The last resolved geolocation fix, kept across runs so a recent position
//! can be reused instead of asking the provider again.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::kv::{KeyValueStore, StorageError, StorageResult};

/// Storage key of the last position fix
pub const LAST_POSITION_KEY: &str = "lastPosition";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Unix time of the fix, in seconds
    pub saved_at: i64,
}

impl SavedPosition {
    /// Whether the fix is no older than `max_age_secs` at `now` (Unix seconds).
    /// Fixes stamped in the future are never fresh.
    pub fn is_fresh(&self, now: i64, max_age_secs: u64) -> bool {
        let age = now - self.saved_at;
        age >= 0 && age.unsigned_abs() <= max_age_secs
    }
}

#[derive(Clone)]
pub struct LastPositionStore {
    store: Arc<dyn KeyValueStore>,
}

impl LastPositionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last saved fix; unset, unreadable or malformed values read as `None`.
    pub fn get(&self) -> Option<SavedPosition> {
        let raw = match self.store.get(LAST_POSITION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Ignoring stored position: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(position) => Some(position),
            Err(e) => {
                tracing::warn!(
                    "Ignoring stored position: {}",
                    StorageError::malformed(LAST_POSITION_KEY, e)
                );
                None
            }
        }
    }

    /// # Errors
    /// Returns `StorageError::Write` if the fix cannot be saved.
    pub fn set(&self, position: &SavedPosition) -> StorageResult<()> {
        let json = serde_json::to_string(position)
            .map_err(|e| StorageError::write(LAST_POSITION_KEY, e))?;
        self.store.set(LAST_POSITION_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv_memory::MemoryStore;

    const FIX: SavedPosition = SavedPosition {
        latitude: 59.91,
        longitude: 10.75,
        saved_at: 1_000,
    };

    #[test]
    fn round_trips_through_storage() {
        let positions = LastPositionStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(positions.get(), None);

        positions.set(&FIX).unwrap();
        assert_eq!(positions.get(), Some(FIX));
    }

    #[test]
    fn malformed_is_none() {
        let positions = LastPositionStore::new(Arc::new(MemoryStore::with_values([(
            LAST_POSITION_KEY,
            r#"{"latitude": "north"}"#,
        )])));
        assert_eq!(positions.get(), None);
    }

    #[test]
    fn freshness() {
        assert!(FIX.is_fresh(1_000, 300));
        assert!(FIX.is_fresh(1_300, 300));
        assert!(!FIX.is_fresh(1_301, 300));
        assert!(!FIX.is_fresh(999, 300));
        assert!(!FIX.is_fresh(1_001, 0));
    }
}
