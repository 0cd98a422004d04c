//! Durable key-value storage
//!
//! The session token and the local todo list live in a small key-value
//! store. Values are plain strings; callers own their encoding.
//!
//! - `FileStore`: one file per key under the data directory (default)
//! - `MemoryStore`: in-process map for tests

pub mod error;
pub mod file;
pub mod memory;

use std::sync::Arc;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-encoded local todo list
pub const LOCAL_TODOS_KEY: &str = "local_todos";

/// A durable string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written or was removed
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Store handle shared by the session and local todo stores
pub type SharedStore = Arc<dyn KeyValueStore>;
