//! Syzygy Mesh Topology
//!
//! Toroidal coordinate space for the Syzygy handover mesh.
//!
//! # Geometry
//!
//! Every peer sits on the surface of a torus, located by two periodic angles:
//! - `theta` runs around the major circle (radius `R`)
//! - `phi` runs around the tube (radius `r`)
//!
//! Both angles live in `[0, 2π)`. Distances are measured along the surface
//! using the shorter arc of each angle, so `0` and `2π - ε` are neighbors,
//! not antipodes.
//!
//! # Grid Layout
//!
//! [`TorusGrid`] lays a `width × height` lattice over the torus with
//! wrap-around edges in both directions. Each slot has exactly 4 links.

mod error;
mod grid;
mod torus;

pub use error::{Error, Result};
pub use grid::{GridSlot, TorusGrid};
pub use torus::{TorusCoord, TorusGeometry, shortest_arc};

/// Default major radius (around the ring).
pub const MAJOR_RADIUS: f64 = 1.0;

/// Default minor radius (around the tube).
pub const MINOR_RADIUS: f64 = 0.2;

/// Links per slot in a wrap-around grid (right, left, down, up).
pub const GRID_DEGREE: usize = 4;

/// Period of both angular coordinates.
pub const PERIOD: f64 = std::f64::consts::TAU;

// The tube must fit inside the ring
const _: () = assert!(MINOR_RADIUS < MAJOR_RADIUS);
