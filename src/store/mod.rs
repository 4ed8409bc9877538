//! Key-value backends
//!
//! The dispatcher only needs three operations: store one pair, fetch one
//! value, and list everything. [`FileStore`] persists to disk and is what the
//! server runs with; [`MemoryStore`] keeps pairs in memory for tests and
//! embedding.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;
use std::io;

/// Failure raised by a backend operation.
#[derive(Debug)]
pub enum StoreError {
    /// The backing file could not be opened, read or written
    Io(io::Error),
    /// A persisted record could not be decoded or encoded
    Corrupt(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store I/O failed: {}", e),
            StoreError::Corrupt(e) => write!(f, "store record is corrupt: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Corrupt(e) => Some(e),
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e)
    }
}

/// Storage collaborator consumed by the dispatcher.
///
/// Implementations acquire whatever resource they need inside each call and
/// release it before returning; nothing is held between requests.
pub trait Backend {
    /// Insert or replace the value stored under `key`.
    fn store(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Look up a single value. `Ok(None)` means the key is not present.
    fn fetch(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Every stored pair, ordered by key.
    fn fetch_all(&self) -> Result<Vec<(String, String)>, StoreError>;
}
