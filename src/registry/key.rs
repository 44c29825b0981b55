//! Storage key layout for peer records
//!
//! `Concatenated` keys are `topic ++ node id`. They sort by topic first, which
//! only holds while every topic has the same length. `LengthPrefixed` keys
//! carry a big-endian u16 topic length in front, so topics of any length
//! partition cleanly.

use serde::{Deserialize, Serialize};

use super::RegistryError;
use crate::types::{NodeId, Topic, NODE_ID_LEN};

/// How peer keys are laid out in the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyLayout {
    /// `<topic><node id>`
    #[default]
    Concatenated,

    /// `<u16 BE topic length><topic><node id>`
    LengthPrefixed,
}

impl KeyLayout {
    /// Key prefix shared by every peer of `topic`
    pub fn topic_prefix(&self, topic: &Topic) -> Result<Vec<u8>, RegistryError> {
        let bytes = topic.as_bytes();
        match self {
            KeyLayout::Concatenated => Ok(bytes.to_vec()),
            KeyLayout::LengthPrefixed => {
                let len = u16::try_from(bytes.len())
                    .map_err(|_| RegistryError::TopicTooLong(bytes.len()))?;
                let mut prefix = Vec::with_capacity(2 + bytes.len());
                prefix.extend_from_slice(&len.to_be_bytes());
                prefix.extend_from_slice(bytes);
                Ok(prefix)
            }
        }
    }

    /// Full storage key for a peer
    pub fn peer_key(&self, topic: &Topic, id: &NodeId) -> Result<Vec<u8>, RegistryError> {
        let mut key = self.topic_prefix(topic)?;
        key.reserve(NODE_ID_LEN);
        key.extend_from_slice(id.as_bytes());
        Ok(key)
    }
}

/// Smallest key greater than every key starting with `prefix`.
///
/// Returns `None` when no such key exists (empty prefix or all `0xFF`), in
/// which case the scan must run to the end of the keyspace.
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
