//! Network configuration.

use std::time::Duration;

use syzygy_topology::TorusGeometry;

use crate::{Error, Result};

/// Default propagation timeout when the caller does not supply a deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a [`Network`](crate::Network).
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Torus radii used by the distance metric.
    pub geometry: TorusGeometry,

    /// Timeout applied by [`Network::propagate_default`](crate::Network::propagate_default).
    pub default_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            geometry: TorusGeometry::default(),
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl NetworkConfig {
    /// Create config from environment variables, falling back to defaults.
    ///
    /// - `SYZYGY_MAJOR_RADIUS`
    /// - `SYZYGY_MINOR_RADIUS`
    /// - `SYZYGY_DEFAULT_TIMEOUT_MS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let major = parse_var(&lookup, "SYZYGY_MAJOR_RADIUS")?
            .unwrap_or(defaults.geometry.major_radius);
        let minor = parse_var(&lookup, "SYZYGY_MINOR_RADIUS")?
            .unwrap_or(defaults.geometry.minor_radius);
        let geometry = TorusGeometry::new(major, minor)?;

        let default_timeout = parse_var::<u64, _>(&lookup, "SYZYGY_DEFAULT_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.default_timeout);

        Ok(Self {
            geometry,
            default_timeout,
        })
    }

    /// Set the torus geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: TorusGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the default propagation timeout.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

/// Parse an optional variable, reporting malformed values.
pub fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e))),
    }
}
