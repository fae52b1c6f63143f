//! Error types for syzygy-propagation.

use syzygy_mesh::PeerId;
use thiserror::Error;

use crate::PropagationId;

/// Result type for propagation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during propagation.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced peer is not registered.
    #[error("peer not found: {0}")]
    PeerNotFound(PeerId),

    /// A traversal branch reached a peer after the deadline.
    ///
    /// Arrivals recorded before the deadline are kept.
    #[error("propagation {propagation_id} exceeded its deadline before reaching {peer}")]
    DeadlineExceeded {
        propagation_id: PropagationId,
        peer: PeerId,
    },

    /// A traversal task panicked or was cancelled by the runtime.
    #[error("traversal task failed: {0}")]
    TaskFailed(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<syzygy_mesh::Error> for Error {
    fn from(e: syzygy_mesh::Error) -> Self {
        match e {
            syzygy_mesh::Error::PeerNotFound(id) => Error::PeerNotFound(id),
        }
    }
}

impl From<syzygy_topology::Error> for Error {
    fn from(e: syzygy_topology::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl Error {
    /// Whether this is a deadline abort (partial results are still valid).
    pub fn is_deadline(&self) -> bool {
        matches!(self, Error::DeadlineExceeded { .. })
    }
}
