//! Peer registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use syzygy_topology::TorusCoord;
use tracing::debug;

use crate::peer::PeerEntry;
use crate::{Error, Peer, PeerId, Result};

/// Thread-safe registry of peers and their links.
///
/// The map lock guards insertion and lookup only. Neighbor lists are
/// guarded per peer.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: RwLock<HashMap<PeerId, Arc<PeerEntry>>>,
}

impl PeerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer with an empty neighbor list.
    ///
    /// Re-registering an existing id replaces the old peer, neighbors
    /// included. Peers that linked to the old entry keep their side of the link.
    pub fn register(&self, id: impl Into<PeerId>, theta: f64, phi: f64, syzygy: f64) {
        let id = id.into();
        let entry = Arc::new(PeerEntry::new(id.clone(), TorusCoord::new(theta, phi), syzygy));
        let replaced = self.peers.write().insert(id.clone(), entry).is_some();
        debug!(peer = %id, theta, phi, syzygy, replaced, "registered peer");
    }

    /// Link two peers in both directions.
    ///
    /// Fails with [`Error::PeerNotFound`] if either is absent. Repeated calls
    /// append repeated entries. A peer linked to itself is listed once.
    pub fn link(&self, a: &str, b: &str) -> Result<()> {
        // Hold the map lock so neither peer can be replaced mid-link
        let peers = self.peers.read();
        let first = peers
            .get(a)
            .ok_or_else(|| Error::PeerNotFound(PeerId::from(a)))?;
        let second = peers
            .get(b)
            .ok_or_else(|| Error::PeerNotFound(PeerId::from(b)))?;

        if Arc::ptr_eq(first, second) {
            first.neighbors.write().push(first.id.clone());
        } else {
            // Fixed lock order prevents deadlock between link(a, b) and link(b, a)
            let (low, high) = if first.id < second.id {
                (first, second)
            } else {
                (second, first)
            };
            let mut low_neighbors = low.neighbors.write();
            let mut high_neighbors = high.neighbors.write();
            low_neighbors.push(high.id.clone());
            high_neighbors.push(low.id.clone());
        }

        debug!(a, b, "linked peers");
        Ok(())
    }

    /// Snapshot of a peer's neighbor list.
    pub fn neighbors_of(&self, id: &str) -> Result<Vec<PeerId>> {
        Ok(self.entry(id)?.neighbors())
    }

    /// A peer's torus coordinate.
    pub fn coord_of(&self, id: &str) -> Result<TorusCoord> {
        Ok(self.entry(id)?.coord)
    }

    /// Snapshot of a whole peer.
    pub fn get(&self, id: &str) -> Option<Peer> {
        self.peers.read().get(id).map(|entry| entry.snapshot())
    }

    /// Whether a peer is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.peers.read().contains_key(id)
    }

    /// Number of registered peers.
    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    /// Snapshot of all registered ids, sorted.
    pub fn ids(&self) -> Vec<PeerId> {
        let mut ids: Vec<_> = self.peers.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn entry(&self, id: &str) -> Result<Arc<PeerEntry>> {
        self.peers
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::PeerNotFound(PeerId::from(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn registry_with(ids: &[&str]) -> PeerRegistry {
        let registry = PeerRegistry::new();
        for (n, id) in ids.iter().enumerate() {
            registry.register(*id, n as f64 * 0.1, 0.0, 0.98);
        }
        registry
    }

    #[test]
    fn register_starts_without_neighbors() {
        let registry = registry_with(&["a"]);
        assert!(registry.contains("a"));
        assert_eq!(registry.len(), 1);
        assert!(registry.neighbors_of("a").unwrap().is_empty());
    }

    #[test]
    fn reregister_overwrites() {
        let registry = registry_with(&["a", "b"]);
        registry.link("a", "b").unwrap();

        registry.register("a", 1.0, 2.0, 0.5);

        let peer = registry.get("a").unwrap();
        assert_eq!(peer.coord, TorusCoord::new(1.0, 2.0));
        assert_eq!(peer.syzygy, 0.5);
        assert!(peer.neighbors.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn link_is_symmetric() {
        let registry = registry_with(&["a", "b"]);
        registry.link("a", "b").unwrap();

        assert_eq!(registry.neighbors_of("a").unwrap(), vec![PeerId::from("b")]);
        assert_eq!(registry.neighbors_of("b").unwrap(), vec![PeerId::from("a")]);
    }

    #[test]
    fn link_missing_peer_fails() {
        let registry = registry_with(&["a"]);

        assert_eq!(
            registry.link("a", "ghost"),
            Err(Error::PeerNotFound(PeerId::from("ghost")))
        );
        assert_eq!(
            registry.link("ghost", "a"),
            Err(Error::PeerNotFound(PeerId::from("ghost")))
        );
        // Nothing half-applied
        assert!(registry.neighbors_of("a").unwrap().is_empty());
    }

    #[test]
    fn repeated_link_appends() {
        let registry = registry_with(&["a", "b"]);
        registry.link("a", "b").unwrap();
        registry.link("b", "a").unwrap();

        assert_eq!(registry.neighbors_of("a").unwrap().len(), 2);
        assert_eq!(registry.neighbors_of("b").unwrap().len(), 2);
    }

    #[test]
    fn self_link_listed_once() {
        let registry = registry_with(&["a"]);
        registry.link("a", "a").unwrap();
        assert_eq!(registry.neighbors_of("a").unwrap(), vec![PeerId::from("a")]);
    }

    #[test]
    fn neighbors_are_snapshots() {
        let registry = registry_with(&["a", "b", "c"]);
        registry.link("a", "b").unwrap();

        let before = registry.neighbors_of("a").unwrap();
        registry.link("a", "c").unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(registry.neighbors_of("a").unwrap().len(), 2);
    }

    #[test]
    fn unknown_peer_lookups() {
        let registry = PeerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("x").is_none());
        assert_eq!(
            registry.neighbors_of("x"),
            Err(Error::PeerNotFound(PeerId::from("x")))
        );
        assert!(registry.coord_of("x").is_err());
    }

    #[test]
    fn concurrent_links_stay_symmetric() {
        let ids: Vec<String> = (0..16).map(|i| format!("p{}", i)).collect();
        let registry = Arc::new(PeerRegistry::new());
        for id in &ids {
            registry.register(id.as_str(), 0.0, 0.0, 1.0);
        }

        // Every thread links every pair, half of them in reverse order
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                let ids = ids.clone();
                thread::spawn(move || {
                    for i in 0..ids.len() {
                        for j in (i + 1)..ids.len() {
                            if t % 2 == 0 {
                                registry.link(&ids[i], &ids[j]).unwrap();
                            } else {
                                registry.link(&ids[j], &ids[i]).unwrap();
                            }
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for a in &ids {
            let neighbors = registry.neighbors_of(a).unwrap();
            assert_eq!(neighbors.len(), 8 * (ids.len() - 1));
            for b in &ids {
                if a == b {
                    continue;
                }
                let forward = neighbors.iter().filter(|n| n.as_str() == b).count();
                let backward = registry
                    .neighbors_of(b)
                    .unwrap()
                    .iter()
                    .filter(|n| n.as_str() == a)
                    .count();
                assert_eq!(forward, backward, "asymmetric link {} - {}", a, b);
            }
        }
    }

    #[test]
    fn ids_are_sorted() {
        let registry = registry_with(&["c", "a", "b"]);
        let ids: Vec<_> = registry.ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
