//! The handover event and its propagation identifier.
//!
//! A handover is opaque to the mesh: the states and the syzygy scalar are
//! carried through untouched. Only `id`, `timestamp` and the origin peer
//! feed the propagation identifier.

use std::borrow::Borrow;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Bytes of the BLAKE3 digest kept in a propagation id.
pub const PROPAGATION_ID_BYTES: usize = 8;

/// Network state snapshot carried by a handover.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub coherence: f64,
    pub fluctuation: f64,
    pub phase: f64,
    pub omega: f64,
}

impl State {
    /// Create a state from its four components.
    pub const fn new(coherence: f64, fluctuation: f64, phase: f64, omega: f64) -> Self {
        Self {
            coherence,
            fluctuation,
            phase,
            omega,
        }
    }
}

/// A state transition to be flooded through the mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handover {
    /// Caller-assigned identifier.
    pub id: u64,
    /// Creation time (unix millis).
    pub timestamp: u64,
    pub from_state: State,
    pub to_state: State,
    pub syzygy: f64,
    /// Set once, when the handover is submitted for propagation.
    pub propagation_id: Option<PropagationId>,
}

impl Handover {
    /// Create a handover stamped with the current time.
    pub fn new(id: u64, from_state: State, to_state: State, syzygy: f64) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self::with_timestamp(id, timestamp, from_state, to_state, syzygy)
    }

    /// Create a handover with an explicit timestamp (unix millis).
    pub fn with_timestamp(
        id: u64,
        timestamp: u64,
        from_state: State,
        to_state: State,
        syzygy: f64,
    ) -> Self {
        Self {
            id,
            timestamp,
            from_state,
            to_state,
            syzygy,
            propagation_id: None,
        }
    }

    /// Timestamp truncated to whole seconds.
    pub fn timestamp_secs(&self) -> u64 {
        self.timestamp / 1000
    }
}

/// Deterministic identifier of one propagation.
///
/// Hex of the first [`PROPAGATION_ID_BYTES`] bytes of
/// `BLAKE3("{handover_id}:{origin}:{timestamp_secs}")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropagationId(String);

impl PropagationId {
    /// Derive the id for a handover leaving `origin`.
    pub fn compute(handover: &Handover, origin: &str) -> Self {
        Self::from_parts(handover.id, origin, handover.timestamp_secs())
    }

    /// Derive the id from its raw inputs.
    pub fn from_parts(handover_id: u64, origin: &str, timestamp_secs: u64) -> Self {
        let data = format!("{}:{}:{}", handover_id, origin, timestamp_secs);
        let hash = blake3::hash(data.as_bytes());
        Self(hex::encode(&hash.as_bytes()[..PROPAGATION_ID_BYTES]))
    }

    /// Borrow as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PropagationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PropagationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
