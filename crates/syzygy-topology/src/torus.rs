//! Toroidal coordinates and geodesic distance.
//!
//! A point on the torus is two angles. The distance between two points is
//! approximated by treating the shorter arc of each angle as one leg of a
//! right triangle: the theta leg scaled by the major radius, the phi leg by
//! the minor radius.

use std::f64::consts::PI;

use crate::{Error, Result, MAJOR_RADIUS, MINOR_RADIUS, PERIOD};

/// Shorter arc between two angles on a circle of period 2π.
///
/// The result lies in `[0, π]`. Angles outside `[0, 2π)` are reduced first,
/// so `shortest_arc(0.0, 2π)` is zero.
#[inline]
pub fn shortest_arc(a: f64, b: f64) -> f64 {
    // |a - b| is bit-identical to |b - a|, which keeps the metric symmetric
    let delta = (a - b).abs() % PERIOD;
    if delta > PI {
        PERIOD - delta
    } else {
        delta
    }
}

/// Radii of the torus the mesh lives on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TorusGeometry {
    /// Radius of the ring (scales the theta arc).
    pub major_radius: f64,
    /// Radius of the tube (scales the phi arc).
    pub minor_radius: f64,
}

impl Default for TorusGeometry {
    fn default() -> Self {
        Self {
            major_radius: MAJOR_RADIUS,
            minor_radius: MINOR_RADIUS,
        }
    }
}

impl TorusGeometry {
    /// Create a geometry, rejecting non-finite or non-positive radii.
    pub fn new(major_radius: f64, minor_radius: f64) -> Result<Self> {
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if !valid(major_radius) || !valid(minor_radius) {
            return Err(Error::InvalidGeometry {
                major: major_radius,
                minor: minor_radius,
            });
        }
        Ok(Self {
            major_radius,
            minor_radius,
        })
    }

    /// Geodesic distance between two coordinates on this torus.
    pub fn distance(&self, a: &TorusCoord, b: &TorusCoord) -> f64 {
        let arc_theta = self.major_radius * shortest_arc(a.theta, b.theta);
        let arc_phi = self.minor_radius * shortest_arc(a.phi, b.phi);
        arc_theta.hypot(arc_phi)
    }
}

/// A position on the torus surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TorusCoord {
    /// Angle around the ring, periodic in `[0, 2π)`.
    pub theta: f64,
    /// Angle around the tube, periodic in `[0, 2π)`.
    pub phi: f64,
}

impl TorusCoord {
    /// Origin of the coordinate system.
    pub const ORIGIN: Self = Self { theta: 0.0, phi: 0.0 };

    /// Create a new coordinate. Angles are stored as given.
    pub const fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// The same point with both angles reduced into `[0, 2π)`.
    pub fn normalized(&self) -> Self {
        Self {
            theta: self.theta.rem_euclid(PERIOD),
            phi: self.phi.rem_euclid(PERIOD),
        }
    }

    /// Geodesic distance to another coordinate.
    pub fn geodesic_distance(&self, other: &Self, geometry: &TorusGeometry) -> f64 {
        geometry.distance(self, other)
    }

    /// Whether both angles coincide modulo 2π.
    pub fn coincides_with(&self, other: &Self) -> bool {
        shortest_arc(self.theta, other.theta) == 0.0 && shortest_arc(self.phi, other.phi) == 0.0
    }
}

impl std::fmt::Display for TorusCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(θ={:.4}, φ={:.4})", self.theta, self.phi)
    }
}
