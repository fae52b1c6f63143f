//! Demo configuration from the environment.

use std::time::Duration;

use syzygy_propagation::config::parse_var;
use syzygy_propagation::{NetworkConfig, Result};

/// What the demo builds and where it floods from.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Grid columns.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
    /// Origin peer id.
    pub origin: String,
    /// Propagation timeout.
    pub timeout: Duration,
    /// Mesh settings.
    pub network: NetworkConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            origin: "node_0_0".to_string(),
            timeout: Duration::from_secs(5),
            network: NetworkConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `SYZYGY_GRID_WIDTH`, `SYZYGY_GRID_HEIGHT`
    /// - `SYZYGY_ORIGIN`
    /// - `SYZYGY_TIMEOUT_MS`
    /// - plus everything [`NetworkConfig::from_env`] reads
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            width: parse_var(&lookup, "SYZYGY_GRID_WIDTH")?.unwrap_or(defaults.width),
            height: parse_var(&lookup, "SYZYGY_GRID_HEIGHT")?.unwrap_or(defaults.height),
            origin: lookup("SYZYGY_ORIGIN").unwrap_or(defaults.origin),
            timeout: parse_var::<u64, _>(&lookup, "SYZYGY_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            network: NetworkConfig::from_lookup(&lookup)?,
        })
    }
}
