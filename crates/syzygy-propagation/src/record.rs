//! Per-propagation delivery record.
//!
//! One `Mutex` covers the arrival map, the delivery tree and the status.
//! Every writer for a propagation goes through [`PropagationRecord::claim`],
//! which checks and marks a peer in a single critical section.

use std::collections::{BTreeMap, HashMap, VecDeque};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use syzygy_mesh::PeerId;
use tokio::time::Instant;

use crate::PropagationId;

/// Parent peer → children it delivered to first, in arrival order.
pub type DeliveryTree = BTreeMap<PeerId, Vec<PeerId>>;

/// Lifecycle of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationStatus {
    /// Traversal still running; arrivals may be added.
    InProgress,
    /// Every reachable peer was visited.
    Complete,
    /// At least one branch hit the deadline. Arrivals are partial.
    DeadlineExceeded,
    /// A traversal task failed. Arrivals are partial.
    Failed,
}

impl PropagationStatus {
    /// Whether the record is sealed.
    pub fn is_final(&self) -> bool {
        !matches!(self, PropagationStatus::InProgress)
    }
}

/// Outcome of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// First arrival: recorded.
    Accepted,
    /// Peer already reached by another branch.
    Duplicate,
    /// Record is sealed; nothing recorded.
    Sealed,
}

#[derive(Debug)]
struct RecordState {
    arrivals: HashMap<PeerId, Instant>,
    tree: DeliveryTree,
    status: PropagationStatus,
}

/// Copy of a record's contents taken under its lock.
#[derive(Debug, Clone)]
pub struct RecordSnapshot {
    pub arrivals: HashMap<PeerId, Instant>,
    pub tree: DeliveryTree,
    pub status: PropagationStatus,
}

/// Delivery tree and arrival times of one propagation.
#[derive(Debug)]
pub struct PropagationRecord {
    id: PropagationId,
    origin: PeerId,
    started: Instant,
    state: Mutex<RecordState>,
}

impl PropagationRecord {
    /// Create an empty, in-progress record.
    pub fn new(id: PropagationId, origin: PeerId) -> Self {
        Self {
            id,
            origin,
            started: Instant::now(),
            state: Mutex::new(RecordState {
                arrivals: HashMap::new(),
                tree: DeliveryTree::new(),
                status: PropagationStatus::InProgress,
            }),
        }
    }

    /// Propagation id.
    pub fn id(&self) -> &PropagationId {
        &self.id
    }

    /// Origin peer.
    pub fn origin(&self) -> &PeerId {
        &self.origin
    }

    /// When the record was created.
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Claim `peer` as reached from `parent` at `at`.
    ///
    /// Check, arrival and tree edge happen under one lock acquisition, so
    /// two racing branches can never both be accepted for the same peer.
    pub fn claim(&self, peer: &PeerId, parent: Option<&PeerId>, at: Instant) -> Claim {
        let mut state = self.state.lock();
        if state.status.is_final() {
            return Claim::Sealed;
        }
        if state.arrivals.contains_key(peer) {
            return Claim::Duplicate;
        }

        state.arrivals.insert(peer.clone(), at);
        if let Some(parent) = parent {
            state
                .tree
                .entry(parent.clone())
                .or_default()
                .push(peer.clone());
        }
        Claim::Accepted
    }

    /// Whether `peer` has been reached. Advisory only: use [`claim`](Self::claim) to decide.
    pub fn is_claimed(&self, peer: &PeerId) -> bool {
        self.state.lock().arrivals.contains_key(peer)
    }

    /// Seal the record. The first seal wins; later calls are ignored.
    pub fn seal(&self, status: PropagationStatus) {
        let mut state = self.state.lock();
        if !state.status.is_final() {
            state.status = status;
        }
    }

    /// Current status.
    pub fn status(&self) -> PropagationStatus {
        self.state.lock().status
    }

    /// Number of peers reached so far.
    pub fn reached(&self) -> usize {
        self.state.lock().arrivals.len()
    }

    /// Consistent copy of arrivals, tree and status.
    pub fn snapshot(&self) -> RecordSnapshot {
        let state = self.state.lock();
        RecordSnapshot {
            arrivals: state.arrivals.clone(),
            tree: state.tree.clone(),
            status: state.status,
        }
    }
}

/// Longest origin-to-leaf path in a delivery tree, in hops.
pub fn tree_depth(tree: &DeliveryTree, origin: &PeerId) -> usize {
    let mut depth = 0;
    let mut queue = VecDeque::from([(origin, 0usize)]);
    while let Some((node, level)) = queue.pop_front() {
        depth = depth.max(level);
        if let Some(children) = tree.get(node) {
            queue.extend(children.iter().map(|child| (child, level + 1)));
        }
    }
    depth
}

/// Largest number of children under one parent.
pub fn tree_max_fanout(tree: &DeliveryTree) -> usize {
    tree.values().map(Vec::len).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PropagationRecord {
        PropagationRecord::new(PropagationId::from_parts(1, "a", 0), PeerId::from("a"))
    }

    fn id(s: &str) -> PeerId {
        PeerId::from(s)
    }

    #[test]
    fn origin_claim_adds_no_edge() {
        let record = record();
        assert_eq!(record.claim(&id("a"), None, Instant::now()), Claim::Accepted);

        let snapshot = record.snapshot();
        assert_eq!(snapshot.arrivals.len(), 1);
        assert!(snapshot.tree.is_empty());
    }

    #[test]
    fn second_claim_is_duplicate() {
        let record = record();
        record.claim(&id("a"), None, Instant::now());
        assert_eq!(record.claim(&id("b"), Some(&id("a")), Instant::now()), Claim::Accepted);
        assert_eq!(record.claim(&id("b"), Some(&id("c")), Instant::now()), Claim::Duplicate);

        let snapshot = record.snapshot();
        assert_eq!(snapshot.tree.get(&id("a")), Some(&vec![id("b")]));
        assert!(snapshot.tree.get(&id("c")).is_none());
    }

    #[test]
    fn sealed_record_refuses_claims() {
        let record = record();
        record.claim(&id("a"), None, Instant::now());
        record.seal(PropagationStatus::DeadlineExceeded);

        assert_eq!(record.claim(&id("b"), Some(&id("a")), Instant::now()), Claim::Sealed);
        assert_eq!(record.reached(), 1);

        record.seal(PropagationStatus::Complete);
        assert_eq!(record.status(), PropagationStatus::DeadlineExceeded);
    }

    #[test]
    fn concurrent_claims_accept_once() {
        use std::sync::Arc;

        let record = Arc::new(record());
        let handles: Vec<_> = (0..16)
            .map(|t| {
                let record = Arc::clone(&record);
                std::thread::spawn(move || {
                    let parent = PeerId::new(format!("parent{}", t));
                    (0..100)
                        .filter(|n| {
                            let peer = PeerId::new(format!("p{}", n));
                            record.claim(&peer, Some(&parent), Instant::now()) == Claim::Accepted
                        })
                        .count()
                })
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 100);

        let snapshot = record.snapshot();
        let edges: usize = snapshot.tree.values().map(Vec::len).sum();
        assert_eq!(edges, 100);
    }

    #[test]
    fn depth_and_fanout() {
        let mut tree = DeliveryTree::new();
        tree.insert(id("a"), vec![id("b"), id("d")]);
        tree.insert(id("b"), vec![id("c")]);

        assert_eq!(tree_depth(&tree, &id("a")), 2);
        assert_eq!(tree_max_fanout(&tree), 2);
        assert_eq!(tree_depth(&DeliveryTree::new(), &id("a")), 0);
        assert_eq!(tree_max_fanout(&DeliveryTree::new()), 0);
    }
}
