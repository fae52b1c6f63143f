//! Error types for syzygy-topology.

use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building topology.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A grid needs at least one slot in each direction.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Radii must be finite and positive.
    #[error("invalid torus geometry: major={major}, minor={minor}")]
    InvalidGeometry { major: f64, minor: f64 },
}
