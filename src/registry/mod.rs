//! Peer Registry Module
//!
//! Persists nodes learned through topic discovery so they survive restarts
//! and can be re-advertised. Records are keyed by `(topic, node id)`; all
//! peers of a topic sit next to each other in key order.

mod key;
mod storage;

pub use key::{prefix_end, KeyLayout};
pub use storage::PeerRegistry;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::codec::CodecError;
use crate::storage::StorageError;

/// How far a topic range query is allowed to scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Stop at the end of the topic's key range
    #[default]
    Bounded,

    /// Start at the topic and run until the limit is met or the store ends.
    /// May return peers of lexicographically later topics.
    Unbounded,
}

/// Registry tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryOptions {
    #[serde(default)]
    pub key_layout: KeyLayout,

    #[serde(default)]
    pub scan_mode: ScanMode,
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to encode node: {0}")]
    Encoding(#[from] CodecError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("topic of {0} bytes does not fit a length-prefixed key")]
    TopicTooLong(usize),
}

/// Counters for registry activity
#[derive(Debug, Default)]
pub struct RegistryMetrics {
    pub peers_added: AtomicU64,
    pub peers_removed: AtomicU64,
    pub range_queries: AtomicU64,
    /// Stored records that failed to decode and were skipped
    pub corrupt_records: AtomicU64,
}

/// Point-in-time copy of `RegistryMetrics`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub peers_added: u64,
    pub peers_removed: u64,
    pub range_queries: u64,
    pub corrupt_records: u64,
}

impl RegistryMetrics {
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            peers_added: self.peers_added.load(Ordering::Relaxed),
            peers_removed: self.peers_removed.load(Ordering::Relaxed),
            range_queries: self.range_queries.load(Ordering::Relaxed),
            corrupt_records: self.corrupt_records.load(Ordering::Relaxed),
        }
    }

    fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
