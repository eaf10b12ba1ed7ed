//! Key-value storage trait and error types.
//!
//! Every piece of persisted client state goes through [`KeyValueStore`], so
//! the backing store can be swapped between SQLite and memory.

use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a key failed.
    #[error("Read failed for '{key}': {message}")]
    Read { key: String, message: String },

    /// Writing or deleting a key failed.
    #[error("Write failed for '{key}': {message}")]
    Write { key: String, message: String },

    /// A stored value could not be decoded.
    #[error("Malformed value for '{key}': {message}")]
    Malformed { key: String, message: String },
}

impl StorageError {
    pub fn read(key: &str, message: impl ToString) -> Self {
        Self::Read {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn write(key: &str, message: impl ToString) -> Self {
        Self::Write {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn malformed(key: &str, message: impl ToString) -> Self {
        Self::Malformed {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// String-keyed, string-valued persistent storage.
///
/// Absent keys read as `None`. Writes replace the whole value; there are no
/// transactions across keys, so concurrent writers race (last write wins).
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    /// Returns `StorageError::Read` if the backend fails.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    /// Returns `StorageError::Write` if the backend fails.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a value; deleting an absent key is not an error.
    ///
    /// # Errors
    /// Returns `StorageError::Write` if the backend fails.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
