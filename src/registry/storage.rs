//! Peer Registry Storage
//!
//! The registry keeps no in-process state besides counters. Concurrency
//! guarantees come from the underlying store: point writes are atomic and a
//! range scan reads a snapshot.

use std::path::Path;
use tracing::{debug, info, warn};

use super::{prefix_end, RegistryError, RegistryMetrics, RegistryOptions, ScanMode};
use crate::codec::{EnodeCodec, NodeCodec};
use crate::storage::{KeyValueStore, RocksStore, StorageError};
use crate::types::{Node, NodeId, Topic};

/// Topic-indexed store of discovered peers
pub struct PeerRegistry<S, C = EnodeCodec> {
    store: S,
    codec: C,
    options: RegistryOptions,
    metrics: RegistryMetrics,
}

impl PeerRegistry<RocksStore> {
    /// Open or create a RocksDB-backed registry at the given path
    pub fn open(path: &Path, options: RegistryOptions) -> Result<Self, RegistryError> {
        let store = RocksStore::open(path)?;
        info!(
            "📦 Peer registry opened at {:?} (layout={:?}, scan={:?})",
            path, options.key_layout, options.scan_mode
        );
        Ok(Self::new(store, options))
    }
}

impl<S: KeyValueStore> PeerRegistry<S> {
    pub fn new(store: S, options: RegistryOptions) -> Self {
        Self::with_codec(store, EnodeCodec, options)
    }
}

impl<S: KeyValueStore, C: NodeCodec> PeerRegistry<S, C> {
    pub fn with_codec(store: S, codec: C, options: RegistryOptions) -> Self {
        Self {
            store,
            codec,
            options,
            metrics: RegistryMetrics::default(),
        }
    }

    /// Store a peer under `topic`, replacing any previous record for it.
    ///
    /// Nothing is written if the node cannot be encoded.
    pub fn add_peer(&self, node: &Node, topic: &Topic) -> Result<(), RegistryError> {
        let data = self.codec.encode(node)?;
        let key = self.options.key_layout.peer_key(topic, &node.id)?;
        self.store.put(&key, &data)?;

        RegistryMetrics::incr(&self.metrics.peers_added);
        debug!("Stored peer {} under topic {}", node.id.short(), topic);
        Ok(())
    }

    /// Delete a peer. Removing an unknown peer succeeds.
    pub fn remove_peer(&self, id: &NodeId, topic: &Topic) -> Result<(), RegistryError> {
        let key = self.options.key_layout.peer_key(topic, id)?;
        self.store.delete(&key)?;

        RegistryMetrics::incr(&self.metrics.peers_removed);
        debug!("Removed peer {} from topic {}", id.short(), topic);
        Ok(())
    }

    /// Return up to `limit` peers for `topic` in key order.
    ///
    /// Records that fail to decode are logged and skipped without counting
    /// against the limit. Storage failures abort the query.
    pub fn get_peers_range(&self, topic: &Topic, limit: usize) -> Result<Vec<Node>, RegistryError> {
        RegistryMetrics::incr(&self.metrics.range_queries);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let lower = self.options.key_layout.topic_prefix(topic)?;
        let upper = match self.options.scan_mode {
            ScanMode::Bounded => prefix_end(&lower),
            ScanMode::Unbounded => None,
        };

        let mut nodes = Vec::new();
        for item in self.store.scan(&lower, upper.as_deref()) {
            let (key, value) = item?;
            match self.codec.decode(&value) {
                Ok(node) => {
                    nodes.push(node);
                    if nodes.len() == limit {
                        break;
                    }
                }
                Err(e) => {
                    RegistryMetrics::incr(&self.metrics.corrupt_records);
                    warn!(
                        "Can't decode peer record (key={}, value={}): {}",
                        hex::encode(&key),
                        String::from_utf8_lossy(&value),
                        e
                    );
                }
            }
        }

        debug!("Range query for topic {} returned {} peers", topic, nodes.len());
        Ok(nodes)
    }

    /// Flush all changes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.store.flush()
    }

    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }

    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}
