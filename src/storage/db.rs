//! RocksDB storage engine
//!
//! Survives restarts so discovered peers can be re-advertised.

use rocksdb::{Direction, IteratorMode, Options, ReadOptions, DB};
use std::path::Path;
use tracing::debug;

use super::{KeyValueStore, ScanIter, StorageError};

/// Key/value store backed by RocksDB
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        // Keep file handles bounded; the registry is small
        opts.set_max_open_files(100);
        opts.set_keep_log_file_num(3);
        opts.set_recycle_log_file_num(2);

        let db = DB::open(&opts, path.as_ref())
            .map_err(|e| StorageError::OpenFailed(e.to_string()))?;
        debug!("Opened RocksDB store at {:?}", path.as_ref());

        Ok(Self { db })
    }
}

impl KeyValueStore for RocksStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.db
            .put(key, value)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        self.db
            .delete(key)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn scan(&self, lower: &[u8], upper: Option<&[u8]>) -> ScanIter<'_> {
        let mut read_opts = ReadOptions::default();
        if let Some(upper) = upper {
            read_opts.set_iterate_upper_bound(upper.to_vec());
        }

        // RocksDB pins an implicit snapshot for the lifetime of the iterator
        let iter = self
            .db
            .iterator_opt(IteratorMode::From(lower, Direction::Forward), read_opts);

        Box::new(iter.map(|item| {
            item.map(|(key, value)| (key.to_vec(), value.to_vec()))
                .map_err(|e| StorageError::ReadFailed(e.to_string()))
        }))
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db
            .flush()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn keys(store: &RocksStore, lower: &[u8], upper: Option<&[u8]>) -> Vec<Vec<u8>> {
        store
            .scan(lower, upper)
            .map(|item| item.unwrap().0)
            .collect()
    }

    #[test]
    fn test_basic_ops() {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksStore::open(temp_dir.path()).unwrap();

        store.put(b"key1", b"value1").unwrap();
        store.put(b"key1", b"value2").unwrap();
        let all: Vec<_> = store.scan(b"", None).map(|i| i.unwrap()).collect();
        assert_eq!(all, vec![(b"key1".to_vec(), b"value2".to_vec())]);

        store.delete(b"key1").unwrap();
        // Deleting twice is not an error
        store.delete(b"key1").unwrap();
        assert!(keys(&store, b"", None).is_empty());
    }

    #[test]
    fn test_scan_bounds() {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksStore::open(temp_dir.path()).unwrap();

        for key in [&b"aa"[..], b"ab", b"b", b"ba", b"c"] {
            store.put(key, b"v").unwrap();
        }

        assert_eq!(
            keys(&store, b"ab", None),
            vec![b"ab".to_vec(), b"b".to_vec(), b"ba".to_vec(), b"c".to_vec()]
        );
        assert_eq!(keys(&store, b"b", Some(b"c")), vec![b"b".to_vec(), b"ba".to_vec()]);
    }

    #[test]
    fn test_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = RocksStore::open(temp_dir.path()).unwrap();
            store.put(b"peer", b"data").unwrap();
            store.flush().unwrap();
        }

        {
            let store = RocksStore::open(temp_dir.path()).unwrap();
            assert_eq!(keys(&store, b"", None), vec![b"peer".to_vec()]);
        }
    }
}
