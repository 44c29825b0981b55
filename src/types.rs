//! Core types for topic-indexed peer discovery
//!
//! A `Node` is what the discovery protocol hands us: an identifier plus the
//! endpoints the peer can be reached on. A `Topic` partitions the registry
//! into independent advertisement groups.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

// =============================================================================
// NODE IDENTIFIER
// =============================================================================

/// Length of a node identifier in bytes
pub const NODE_ID_LEN: usize = 32;

/// Fixed-width node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub [u8; NODE_ID_LEN]);

impl NodeId {
    pub const fn from_bytes(bytes: [u8; NODE_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NODE_ID_LEN] {
        &self.0
    }

    /// Short form for log lines
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Errors when parsing a hex node identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("node id must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| NodeIdError::InvalidHex(e.to_string()))?;
        if bytes.len() != NODE_ID_LEN {
            return Err(NodeIdError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; NODE_ID_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex::encode(self.0).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TOPIC
// =============================================================================

/// Advertisement channel identifier (opaque bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Topic(Vec<u8>);

impl Topic {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for Topic {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for Topic {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "0x{}", hex::encode(&self.0)),
        }
    }
}

// =============================================================================
// NODE
// =============================================================================

/// A peer learned through the discovery protocol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier
    pub id: NodeId,

    /// Address shared by both endpoints
    pub ip: IpAddr,

    /// Discovery (UDP) port
    pub udp_port: u16,

    /// Session (TCP) port
    pub tcp_port: u16,
}

impl Node {
    pub fn new(id: NodeId, ip: IpAddr, udp_port: u16, tcp_port: u16) -> Self {
        Self {
            id,
            ip,
            udp_port,
            tcp_port,
        }
    }
}
