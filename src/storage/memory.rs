//! In-memory storage engine
//!
//! The map sits behind an `Arc` that writers replace copy-on-write. A scan
//! clones the `Arc`, so it reads a fixed snapshot and pulls entries one at a
//! time instead of copying its whole range up front.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, RwLock};

use super::{KeyValueStore, KvPair, ScanIter, StorageError};

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// Ordered in-memory store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<Arc<Map>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        // Clones the map only while a scan still holds the old snapshot
        Arc::make_mut(&mut *entries).insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::LockPoisoned)?;
        if entries.contains_key(key) {
            Arc::make_mut(&mut *entries).remove(key);
        }
        Ok(())
    }

    fn scan(&self, lower: &[u8], upper: Option<&[u8]>) -> ScanIter<'_> {
        let snapshot = match self.entries.read() {
            Ok(entries) => Arc::clone(&*entries),
            Err(_) => return Box::new(std::iter::once(Err(StorageError::LockPoisoned))),
        };

        let upper = match upper {
            Some(upper) if upper <= lower => return Box::new(std::iter::empty()),
            Some(upper) => Bound::Excluded(upper.to_vec()),
            None => Bound::Unbounded,
        };

        Box::new(SnapshotIter {
            snapshot,
            next_lower: Bound::Included(lower.to_vec()),
            upper,
        })
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Forward cursor over a map snapshot
struct SnapshotIter {
    snapshot: Arc<Map>,
    next_lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
}

impl Iterator for SnapshotIter {
    type Item = Result<KvPair, StorageError>;

    fn next(&mut self) -> Option<Self::Item> {
        // next_lower always sorts strictly below a bounded upper, so range() cannot panic
        let (key, value) = self
            .snapshot
            .range((self.next_lower.clone(), self.upper.clone()))
            .next()
            .map(|(k, v)| (k.clone(), v.clone()))?;

        self.next_lower = Bound::Excluded(key.clone());
        Some(Ok((key, value)))
    }
}
