//! The public face of a Syzygy mesh.

use std::sync::Arc;
use std::time::Duration;

use syzygy_mesh::{Peer, PeerRegistry};
use tokio::time::Instant;

use crate::{
    stats, Handover, HandoverLog, NetworkConfig, PropagationEngine, PropagationId,
    PropagationLedger, PropagationStats, Result,
};

/// Peers, links, propagations and their statistics.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    registry: Arc<PeerRegistry>,
    ledger: Arc<PropagationLedger>,
    handovers: Arc<HandoverLog>,
    engine: PropagationEngine,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

impl Network {
    /// Create an empty network.
    pub fn new(config: NetworkConfig) -> Self {
        let registry = Arc::new(PeerRegistry::new());
        let ledger = Arc::new(PropagationLedger::new());
        let handovers = Arc::new(HandoverLog::new());
        let engine = PropagationEngine::new(
            Arc::clone(&registry),
            Arc::clone(&ledger),
            Arc::clone(&handovers),
        );
        Self {
            config,
            registry,
            ledger,
            handovers,
            engine,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Register (or replace) a peer.
    pub fn register_peer(&self, id: &str, theta: f64, phi: f64, syzygy: f64) {
        self.registry.register(id, theta, phi, syzygy);
    }

    /// Link two registered peers in both directions.
    pub fn link_peers(&self, a: &str, b: &str) -> Result<()> {
        Ok(self.registry.link(a, b)?)
    }

    /// Snapshot of a peer.
    pub fn peer(&self, id: &str) -> Option<Peer> {
        self.registry.get(id)
    }

    /// Number of registered peers.
    pub fn peer_count(&self) -> usize {
        self.registry.len()
    }

    /// Geodesic distance between two peers on the configured torus.
    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a = self.registry.coord_of(a)?;
        let b = self.registry.coord_of(b)?;
        Ok(self.config.geometry.distance(&a, &b))
    }

    /// Flood a handover from `origin`, stopping new hops at `deadline`.
    pub async fn propagate(
        &self,
        handover: &mut Handover,
        origin: &str,
        deadline: Instant,
    ) -> Result<PropagationId> {
        self.engine.propagate(handover, origin, deadline).await
    }

    /// Flood a handover with a deadline `timeout` from now.
    ///
    /// Timeouts past the representable range (`Duration::MAX`) mean no
    /// practical deadline.
    pub async fn propagate_within(
        &self,
        handover: &mut Handover,
        origin: &str,
        timeout: Duration,
    ) -> Result<PropagationId> {
        self.propagate(handover, origin, deadline_after(timeout)).await
    }

    /// Flood a handover with the configured default timeout.
    pub async fn propagate_default(
        &self,
        handover: &mut Handover,
        origin: &str,
    ) -> Result<PropagationId> {
        self.propagate_within(handover, origin, self.config.default_timeout)
            .await
    }

    /// Statistics for a propagation, `None` if no such propagation exists.
    pub fn stats(&self, propagation_id: &str) -> Option<PropagationStats> {
        stats::stats(&self.ledger, propagation_id)
    }

    /// The last submitted handover with this id.
    pub fn handover(&self, id: u64) -> Option<Handover> {
        self.handovers.get(id)
    }

    /// Number of propagations recorded.
    pub fn propagation_count(&self) -> usize {
        self.ledger.len()
    }
}

/// `now + timeout`, saturating at roughly thirty years out.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, PropagationStatus, State};
    use std::f64::consts::PI;

    #[test]
    fn distance_between_registered_peers() {
        let network = Network::default();
        network.register_peer("a", 0.0, 0.0, 1.0);
        network.register_peer("b", PI, 0.0, 1.0);

        let d = network.distance("a", "b").unwrap();
        assert!((d - PI).abs() < 1e-9);
        assert_eq!(network.distance("a", "b").unwrap(), network.distance("b", "a").unwrap());
        assert_eq!(network.distance("a", "a").unwrap(), 0.0);
    }

    #[test]
    fn distance_to_unknown_peer_fails() {
        let network = Network::default();
        network.register_peer("a", 0.0, 0.0, 1.0);
        assert!(matches!(network.distance("a", "zz"), Err(Error::PeerNotFound(_))));
        assert!(matches!(network.link_peers("zz", "a"), Err(Error::PeerNotFound(_))));
    }

    #[tokio::test]
    async fn handover_log_keeps_stamped_copy() {
        let network = Network::default();
        network.register_peer("a", 0.0, 0.0, 1.0);

        let mut handover =
            Handover::with_timestamp(9, 5_000, State::default(), State::default(), 0.5);
        let id = network.propagate_default(&mut handover, "a").await.unwrap();

        let logged = network.handover(9).unwrap();
        assert_eq!(logged.propagation_id, Some(id));
        assert_eq!(logged, handover);
        assert_eq!(network.propagation_count(), 1);
    }

    #[test]
    fn oversized_timeout_saturates() {
        let deadline = deadline_after(Duration::MAX);
        assert!(deadline > Instant::now() + Duration::from_secs(86_400 * 365));
    }

    #[tokio::test]
    async fn unbounded_timeout_reaches_everyone() {
        let network = Network::default();
        for id in ["p0", "p1", "p2", "p3"] {
            network.register_peer(id, 0.0, 0.0, 1.0);
        }
        network.link_peers("p0", "p1").unwrap();
        network.link_peers("p1", "p2").unwrap();
        network.link_peers("p2", "p3").unwrap();

        let mut handover = Handover::new(1, State::default(), State::default(), 0.9);
        let id = network
            .propagate_within(&mut handover, "p0", Duration::MAX)
            .await
            .unwrap();

        let stats = network.stats(id.as_str()).unwrap();
        assert_eq!(stats.nodes_reached, 4);
        assert_eq!(stats.status, PropagationStatus::Complete);
    }

    #[test]
    fn unknown_propagation_has_no_stats() {
        assert!(Network::default().stats("ffffffffffffffff").is_none());
    }
}
