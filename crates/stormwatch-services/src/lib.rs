//! Persisted client state: the key-value store, the favorites list, the
//! last viewed location and the last geolocation fix.

pub mod favorites;
pub mod kv;
pub mod kv_memory;
pub mod kv_sqlite;
pub mod last_location;
pub mod last_position;

pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use kv::{KeyValueStore, StorageError, StorageResult};
pub use kv_memory::MemoryStore;
pub use kv_sqlite::SqliteStore;
pub use last_location::{LastLocationStore, LAST_CITY_KEY};
pub use last_position::{LastPositionStore, SavedPosition, LAST_POSITION_KEY};
