//! Local key-value storage.
//!
//! Shop state is persisted as string values under a handful of well-known
//! keys, the way a browser's local storage holds them:
//!
//! | Key | Value |
//! |-----|-------|
//! | `cart` | JSON array of cart lines |
//! | `users` | JSON array of registered users |
//! | `session_user` | plain username of the signed-in shopper |
//!
//! Reads tolerate absence. Writes overwrite the whole value.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-memory map that records which keys changed; the web
//!   layer uses it as a snapshot of the browser session
//! - [`FileStore`] - a JSON file on disk, one per profile (used by the CLI)

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Cart lines (JSON array).
    pub const CART: &str = "cart";

    /// Registered users (JSON array).
    pub const USERS: &str = "users";

    /// Signed-in username (plain string).
    pub const SESSION_USER: &str = "session_user";

    /// All keys the shop reads and writes.
    pub const ALL: [&str; 3] = [CART, USERS, SESSION_USER];
}

/// Errors that can occur while writing to a store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Value could not be serialized.
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Backing file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A string key-value store scoped to one shopper.
pub trait LocalStore {
    /// Read a value. Absent keys return `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium rejects the write.
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Delete a value. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing medium rejects the write.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
