//! Propagation ledger and handover log.
//!
//! Both are plain keyed stores behind their own `RwLock`, separate from the
//! per-record locks so unrelated propagations never contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Handover, PropagationId, PropagationRecord};

/// Propagation id → record.
#[derive(Debug, Default)]
pub struct PropagationLedger {
    records: RwLock<HashMap<PropagationId, Arc<PropagationRecord>>>,
}

impl PropagationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record under its id, returning the record it replaced.
    pub fn insert(&self, record: Arc<PropagationRecord>) -> Option<Arc<PropagationRecord>> {
        self.records.write().insert(record.id().clone(), record)
    }

    /// Look up a record. Unknown ids are `None`, not an error.
    pub fn get(&self, id: &str) -> Option<Arc<PropagationRecord>> {
        self.records.read().get(id).cloned()
    }

    /// Whether a record exists.
    pub fn contains(&self, id: &str) -> bool {
        self.records.read().contains_key(id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// All propagation ids, sorted.
    pub fn ids(&self) -> Vec<PropagationId> {
        let mut ids: Vec<_> = self.records.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Handover id → last submitted handover.
#[derive(Debug, Default)]
pub struct HandoverLog {
    handovers: RwLock<HashMap<u64, Handover>>,
}

impl HandoverLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted handover. Last write wins.
    pub fn insert(&self, handover: Handover) {
        self.handovers.write().insert(handover.id, handover);
    }

    /// Copy of a submitted handover.
    pub fn get(&self, id: u64) -> Option<Handover> {
        self.handovers.read().get(&id).cloned()
    }

    /// Number of handovers.
    pub fn len(&self) -> usize {
        self.handovers.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.handovers.read().is_empty()
    }
}
