//! Favorite cities, persisted as a JSON array under one key.
//!
//! The list is unique by exact (case-sensitive) name and keeps insertion
//! order. Nothing is cached: every call reads storage, and mutations write
//! the whole list back.

use std::sync::Arc;

use crate::kv::{KeyValueStore, StorageError, StorageResult};

/// Storage key of the favorites list
pub const FAVORITES_KEY: &str = "favorites";

#[derive(Clone)]
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current favorites in insertion order.
    ///
    /// Missing, unreadable or malformed data reads as an empty list; the
    /// failure is logged and never returned.
    pub fn list(&self) -> Vec<String> {
        match self.load() {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::warn!("Ignoring stored favorites: {}", e);
                Vec::new()
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.list().iter().any(|city| city == name)
    }

    /// Append `name` unless it is already present.
    ///
    /// # Errors
    /// Returns `StorageError::Read` if the stored list cannot be read (nothing
    /// is written then), or `StorageError::Write` if it cannot be saved.
    pub fn add(&self, name: &str) -> StorageResult<()> {
        let mut favorites = self.load_for_update()?;
        if !favorites.iter().any(|city| city == name) {
            favorites.push(name.to_string());
            tracing::info!("Added favorite: {}", name);
        }
        self.save(&favorites)
    }

    /// Drop every entry equal to `name`; absent names are not an error.
    ///
    /// # Errors
    /// Returns `StorageError::Read` if the stored list cannot be read (nothing
    /// is written then), or `StorageError::Write` if it cannot be saved.
    pub fn remove(&self, name: &str) -> StorageResult<()> {
        let mut favorites = self.load_for_update()?;
        let before = favorites.len();
        favorites.retain(|city| city != name);
        if favorites.len() != before {
            tracing::info!("Removed favorite: {}", name);
        }
        self.save(&favorites)
    }

    /// Stored list for a read-modify-write. Malformed data starts over from an
    /// empty list; a failed read is returned so the real list is never replaced.
    fn load_for_update(&self) -> StorageResult<Vec<String>> {
        match self.load() {
            Err(e @ StorageError::Malformed { .. }) => {
                tracing::warn!("Replacing unreadable favorites: {}", e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    fn load(&self) -> StorageResult<Vec<String>> {
        let Some(raw) = self.store.get(FAVORITES_KEY)? else {
            return Ok(Vec::new());
        };

        let mut favorites: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| StorageError::malformed(FAVORITES_KEY, e))?;

        // Hand-edited data may carry duplicates; keep the first occurrence
        let mut seen = std::collections::HashSet::new();
        favorites.retain(|city| seen.insert(city.clone()));

        Ok(favorites)
    }

    fn save(&self, favorites: &[String]) -> StorageResult<()> {
        let json = serde_json::to_string(favorites)
            .map_err(|e| StorageError::write(FAVORITES_KEY, e))?;
        self.store.set(FAVORITES_KEY, &json)
    }
}
