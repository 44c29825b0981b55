//! KratOs Rendezvous
//!
//! Two small services used by KratOs light nodes:
//!
//! - **Peer registry**: persists peers learned through topic discovery,
//!   keyed by `(topic, node id)`, so they survive restarts and can be
//!   re-advertised.
//! - **RPC routing**: decides per call whether to execute against the local
//!   node or forward to an upstream provider.
//!
//! ```text
//! discovery ──► PeerRegistry::add_peer ──► KeyValueStore (RocksDB)
//! advertiser ◄─ PeerRegistry::get_peers_range ◄─ scan(topic range)
//!
//! JSON-RPC call ──► Router::route_remote(method)
//!                     ├─ true  ──► UpstreamClient
//!                     └─ false ──► LocalHandler
//! ```

pub mod codec;
pub mod config;
pub mod registry;
pub mod rpc;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;

pub use codec::{CodecError, EnodeCodec, NodeCodec};
pub use config::RendezvousConfig;
pub use registry::{KeyLayout, PeerRegistry, RegistryError, RegistryOptions, ScanMode};
pub use rpc::{Dispatcher, Route, Router};
pub use storage::{KeyValueStore, MemoryStore, RocksStore, StorageError};
pub use types::{Node, NodeId, Topic};
