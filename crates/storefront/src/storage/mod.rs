//! Local key-value persistence.
//!
//! Mirrors the browser `localStorage` contract: string keys mapped to string
//! values, read and written synchronously. The cart only ever uses one key
//! (see [`crate::cart_store`]), but the storage layer is key-agnostic.
//!
//! # Implementations
//!
//! - [`FileStorage`] - one JSON document on disk, used by the binaries
//! - [`MemoryStorage`] - process-local map, used by tests

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document exists but is not a JSON object of strings.
    #[error("Corrupt storage document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A synchronous string key-value store.
pub trait LocalStorage: Send + Sync {
    /// Get the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Replace the value under `key` with `update(current)`, holding the
    /// store's lock across the read and the write so concurrent updates of
    /// the same key never interleave.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read or
    /// written, or whatever error `update` returns. Nothing is written in
    /// either case.
    fn update_item(
        &self,
        key: &str,
        update: &mut dyn FnMut(Option<String>) -> Result<String, StorageError>,
    ) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
