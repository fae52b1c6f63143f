//! Syzygy Handover Propagation
//!
//! Floods a handover event from an origin peer to every reachable peer of
//! the mesh, exactly once each, and keeps a ledger of how it spread.
//!
//! # Architecture
//!
//! - **Engine**: task-per-edge flood with a join per hop and a cooperative deadline
//! - **Record**: arrival map + delivery tree for one propagation, one lock
//! - **Ledger**: propagation id → record; handover log by handover id
//! - **Stats**: reach, latency and tree shape derived from a record
//! - **Network**: facade over registry, engine and ledger
//!
//! # Example
//!
//! ```no_run
//! use syzygy_propagation::{Handover, Network, State};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let network = Network::default();
//!     network.register_peer("a", 0.0, 0.0, 0.98);
//!     network.register_peer("b", 1.0, 0.0, 0.98);
//!     network.link_peers("a", "b")?;
//!
//!     let mut handover = Handover::new(1, State::default(), State::default(), 0.98);
//!     let id = network.propagate_default(&mut handover, "a").await?;
//!     let stats = network.stats(id.as_str()).expect("just propagated");
//!     assert_eq!(stats.nodes_reached, 2);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod handover;
pub mod ledger;
pub mod network;
pub mod record;
pub mod stats;

pub use config::NetworkConfig;
pub use engine::PropagationEngine;
pub use error::{Error, Result};
pub use handover::{Handover, PropagationId, State};
pub use ledger::{HandoverLog, PropagationLedger};
pub use network::Network;
pub use record::{DeliveryTree, PropagationRecord, PropagationStatus};
pub use stats::PropagationStats;

pub use syzygy_mesh::{Peer, PeerId};
pub use syzygy_topology::{TorusCoord, TorusGeometry};
