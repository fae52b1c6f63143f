//! Post-hoc propagation statistics.

use std::time::Duration;

use serde::{Serialize, Serializer};
use syzygy_mesh::PeerId;

use crate::record::{tree_depth, tree_max_fanout, DeliveryTree, PropagationStatus};
use crate::{PropagationId, PropagationLedger, PropagationRecord};

/// Reach, latency and tree shape of one propagation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropagationStats {
    pub propagation_id: PropagationId,
    pub origin_node: PeerId,
    pub status: PropagationStatus,
    pub nodes_reached: usize,
    /// Last arrival minus first arrival. Zero with fewer than two arrivals.
    #[serde(rename = "total_latency_ms", serialize_with = "serialize_millis")]
    pub total_latency: Duration,
    /// Hops from the origin to the farthest reached peer.
    pub depth: usize,
    pub max_fanout: usize,
    pub propagation_tree: DeliveryTree,
}

impl PropagationStats {
    /// Compute stats from a consistent snapshot of a record.
    pub fn from_record(record: &PropagationRecord) -> Self {
        let snapshot = record.snapshot();

        let first = snapshot.arrivals.values().min();
        let last = snapshot.arrivals.values().max();
        let total_latency = match (first, last) {
            (Some(first), Some(last)) => last.duration_since(*first),
            _ => Duration::ZERO,
        };

        Self {
            propagation_id: record.id().clone(),
            origin_node: record.origin().clone(),
            status: snapshot.status,
            nodes_reached: snapshot.arrivals.len(),
            total_latency,
            depth: tree_depth(&snapshot.tree, record.origin()),
            max_fanout: tree_max_fanout(&snapshot.tree),
            propagation_tree: snapshot.tree,
        }
    }

    /// Pretty JSON rendering.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Stats for a propagation id, or `None` if the ledger has no such record.
pub fn stats(ledger: &PropagationLedger, id: &str) -> Option<PropagationStats> {
    ledger.get(id).map(|record| PropagationStats::from_record(&record))
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_micros() as f64 / 1000.0)
}
