//! Error types for syzygy-mesh.

use thiserror::Error;

use crate::PeerId;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The referenced peer is not registered.
    #[error("peer not found: {0}")]
    PeerNotFound(PeerId),
}
