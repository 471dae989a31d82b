//! Snapshot storage
//!
//! A durable key-value slot the cart writes its snapshot to after every
//! committed mutation and reads once when a session starts.

use std::io;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the slot failed.
    #[error("storage IO failed for key {key}")]
    Io {
        /// Slot key
        key: String,

        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Keys must be non-empty and made of ASCII letters, digits, `.`, `_` or `-`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Durable key-value slot.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStorage {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
