//! Syzygy Peer Mesh
//!
//! The peer registry for the Syzygy handover network. Peers are placed on a
//! torus (see `syzygy-topology`) and connected by undirected links.
//!
//! # Locking
//!
//! The registry map sits behind one `RwLock` used only for insertion and
//! lookup. Each peer's neighbor list has its own lock, so linking unrelated
//! peers never contends. Readers only ever receive snapshot copies.
//!
//! # Adjacency Invariant
//!
//! If peer A lists B as a neighbor, B lists A. [`PeerRegistry::link`] takes
//! both peers' locks in id order and appends in both directions before
//! releasing either, so no reader observes a half-made link.

mod error;
mod peer;
mod registry;

pub use error::{Error, Result};
pub use peer::{Peer, PeerId};
pub use registry::PeerRegistry;
