//! Syzygy demo
//!
//! Lays a toroidal grid of peers, floods one handover from the origin and
//! prints the propagation stats as JSON on stdout. Logs go to stderr.

mod config;

use syzygy_propagation::{Handover, Network, State};
use syzygy_topology::{GridSlot, TorusGrid};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::DemoConfig;

/// Peer id for a grid slot.
fn slot_id(slot: GridSlot) -> String {
    format!("node_{}_{}", slot.i, slot.j)
}

/// Register every slot of `grid` and link each to its right and lower neighbor.
fn build_grid(network: &Network, grid: &TorusGrid) -> syzygy_propagation::Result<()> {
    for slot in grid.slots() {
        let coord = grid.coord_of(slot);
        let syzygy = 0.98 + 0.01 * (coord.theta + coord.phi).sin();
        network.register_peer(&slot_id(slot), coord.theta, coord.phi, syzygy);
    }
    for (a, b) in grid.links() {
        network.link_peers(&slot_id(a), &slot_id(b))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syzygy_demo=info,syzygy_propagation=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DemoConfig::from_env()?;
    let grid = TorusGrid::new(config.width, config.height)?;

    let network = Network::new(config.network.clone());
    build_grid(&network, &grid)?;
    tracing::info!(
        peers = network.peer_count(),
        width = grid.width(),
        height = grid.height(),
        "network created"
    );

    let mut handover = Handover::new(
        1,
        State::new(0.86, 0.14, 0.0, 0.00),
        State::new(0.86, 0.14, 0.1, 0.07),
        0.98,
    );

    let propagation_id = match network
        .propagate_within(&mut handover, &config.origin, config.timeout)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Propagation error: {}", e);
            return Err(e.into());
        }
    };

    let stats = network
        .stats(propagation_id.as_str())
        .ok_or("propagation record missing")?;
    println!("{}", stats.to_json_pretty()?);

    Ok(())
}
