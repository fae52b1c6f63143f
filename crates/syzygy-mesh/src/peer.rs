//! Peer identity and peer records.

use std::borrow::Borrow;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use syzygy_topology::TorusCoord;

/// Opaque peer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    /// Create a peer id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&PeerId> for PeerId {
    fn from(id: &PeerId) -> Self {
        id.clone()
    }
}

impl std::ops::Deref for PeerId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PeerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point-in-time copy of a registered peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    /// The peer's identifier.
    pub id: PeerId,
    /// Position on the torus.
    pub coord: TorusCoord,
    /// Coherence-like scalar carried with the peer. Opaque to the mesh.
    pub syzygy: f64,
    /// Neighbors in link order. May contain repeats if a pair was linked twice.
    pub neighbors: Vec<PeerId>,
}

impl Peer {
    /// Number of neighbor entries.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// Registry-owned peer state. Only the neighbor list is mutable.
#[derive(Debug)]
pub(crate) struct PeerEntry {
    pub(crate) id: PeerId,
    pub(crate) coord: TorusCoord,
    pub(crate) syzygy: f64,
    pub(crate) neighbors: RwLock<Vec<PeerId>>,
}

impl PeerEntry {
    pub(crate) fn new(id: PeerId, coord: TorusCoord, syzygy: f64) -> Self {
        Self {
            id,
            coord,
            syzygy,
            neighbors: RwLock::new(Vec::new()),
        }
    }

    /// Copy of the neighbor list.
    pub(crate) fn neighbors(&self) -> Vec<PeerId> {
        self.neighbors.read().clone()
    }

    pub(crate) fn snapshot(&self) -> Peer {
        Peer {
            id: self.id.clone(),
            coord: self.coord,
            syzygy: self.syzygy,
            neighbors: self.neighbors(),
        }
    }
}
