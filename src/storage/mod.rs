//! Storage engine seam
//!
//! The registry only needs ordered byte keys, atomic point writes and a
//! forward range scan over a consistent snapshot. `RocksStore` is the
//! persistent engine; `MemoryStore` backs tests and ephemeral nodes.

mod db;
mod memory;

pub use db::RocksStore;
pub use memory::MemoryStore;

/// A key/value pair yielded by a scan
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Forward iterator over a scan snapshot
pub type ScanIter<'a> = Box<dyn Iterator<Item = Result<KvPair, StorageError>> + 'a>;

/// Ordered byte-key/byte-value store
pub trait KeyValueStore: Send + Sync {
    /// Write a value, replacing any previous one
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key succeeds.
    fn delete(&self, key: &[u8]) -> Result<(), StorageError>;

    /// Iterate keys in `[lower, upper)` in unsigned lexicographic order.
    /// `None` scans to the end of the keyspace.
    fn scan(&self, lower: &[u8], upper: Option<&[u8]>) -> ScanIter<'_>;

    /// Persist buffered writes
    fn flush(&self) -> Result<(), StorageError>;
}

/// Storage engine errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open database: {0}")]
    OpenFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}
