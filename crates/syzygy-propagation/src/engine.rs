//! Flood propagation engine.
//!
//! # Traversal
//!
//! Each hop is one task. On entry a task checks the deadline, then claims
//! its peer in the record. A successful claim spawns one child task per
//! neighbor (except the peer it came from) and waits for all of them, so
//! the origin call returns only when the whole flood has unwound.
//!
//! ```text
//! visit(P, from F)
//!   deadline passed?     -> DeadlineExceeded
//!   claim(P, F) refused? -> stop
//!   for N in neighbors(P) \ {F}: spawn visit(N, from P)
//!   join all
//! ```
//!
//! Cancellation is cooperative: a branch that passed its deadline check
//! keeps running. Arrivals are never rolled back.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use syzygy_mesh::{PeerId, PeerRegistry};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::record::{Claim, PropagationStatus};
use crate::{
    Error, Handover, HandoverLog, PropagationId, PropagationLedger, PropagationRecord, Result,
};

/// Runs propagations over a shared registry and records them in a ledger.
///
/// Must be driven from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct PropagationEngine {
    registry: Arc<PeerRegistry>,
    ledger: Arc<PropagationLedger>,
    handovers: Arc<HandoverLog>,
}

/// State shared by every task of one propagation.
struct Traversal {
    registry: Arc<PeerRegistry>,
    record: Arc<PropagationRecord>,
    deadline: Instant,
}

impl PropagationEngine {
    /// Create an engine.
    pub fn new(
        registry: Arc<PeerRegistry>,
        ledger: Arc<PropagationLedger>,
        handovers: Arc<HandoverLog>,
    ) -> Self {
        Self {
            registry,
            ledger,
            handovers,
        }
    }

    /// Flood `handover` from `origin` until every reachable peer has it or
    /// the deadline passes.
    ///
    /// Fails with [`Error::PeerNotFound`] before touching the ledger if the
    /// origin is unknown. Otherwise the handover is stamped with its
    /// propagation id and a record exists whatever the outcome.
    pub async fn propagate(
        &self,
        handover: &mut Handover,
        origin: &str,
        deadline: Instant,
    ) -> Result<PropagationId> {
        if !self.registry.contains(origin) {
            return Err(Error::PeerNotFound(PeerId::from(origin)));
        }
        let origin = PeerId::from(origin);

        let propagation_id = PropagationId::compute(handover, &origin);
        let record = Arc::new(PropagationRecord::new(propagation_id.clone(), origin.clone()));
        if let Some(previous) = self.ledger.insert(Arc::clone(&record)) {
            warn!(
                propagation = %propagation_id,
                previous_reached = previous.reached(),
                "replacing existing propagation record"
            );
        }

        handover.propagation_id = Some(propagation_id.clone());
        self.handovers.insert(handover.clone());

        info!(
            propagation = %propagation_id,
            handover = handover.id,
            origin = %origin,
            "starting handover propagation"
        );

        let traversal = Arc::new(Traversal {
            registry: Arc::clone(&self.registry),
            record: Arc::clone(&record),
            deadline,
        });
        let outcome = visit(traversal, origin, None).await;

        let status = match &outcome {
            Ok(()) => PropagationStatus::Complete,
            Err(e) if e.is_deadline() => PropagationStatus::DeadlineExceeded,
            Err(_) => PropagationStatus::Failed,
        };
        record.seal(status);

        info!(
            propagation = %propagation_id,
            reached = record.reached(),
            ?status,
            "handover propagation finished"
        );

        outcome.map(|()| propagation_id)
    }
}

/// Visit `current`, arriving from `from`, then flood its neighbors.
fn visit(
    traversal: Arc<Traversal>,
    current: PeerId,
    from: Option<PeerId>,
) -> BoxFuture<'static, Result<()>> {
    async move {
        let now = Instant::now();
        if now >= traversal.deadline {
            debug!(
                propagation = %traversal.record.id(),
                peer = %current,
                "deadline passed, abandoning branch"
            );
            return Err(Error::DeadlineExceeded {
                propagation_id: traversal.record.id().clone(),
                peer: current,
            });
        }

        match traversal.record.claim(&current, from.as_ref(), now) {
            Claim::Accepted => {}
            Claim::Duplicate => {
                trace!(peer = %current, "already reached");
                return Ok(());
            }
            // Sealing happens after the root join, so only a task outliving
            // its own propagation could see this.
            Claim::Sealed => {
                debug!(peer = %current, "arrival after propagation was sealed");
                return Ok(());
            }
        }
        trace!(peer = %current, from = ?from.as_ref().map(PeerId::as_str), "reached");

        let neighbors = traversal.registry.neighbors_of(&current)?;

        let mut children = JoinSet::new();
        for neighbor in neighbors {
            if from.as_ref() == Some(&neighbor) {
                continue;
            }
            // Saves a spawn; the claim inside the child stays authoritative
            if traversal.record.is_claimed(&neighbor) {
                continue;
            }
            children.spawn(visit(Arc::clone(&traversal), neighbor, Some(current.clone())));
        }

        let mut outcome = Ok(());
        while let Some(joined) = children.join_next().await {
            let result = joined
                .map_err(|e| Error::TaskFailed(e.to_string()))
                .and_then(|r| r);
            if let Err(e) = result {
                if !e.is_deadline() {
                    warn!(peer = %current, error = %e, "traversal branch failed");
                }
                if outcome.is_ok() {
                    outcome = Err(e);
                }
            }
        }
        outcome
    }
    .boxed()
}
