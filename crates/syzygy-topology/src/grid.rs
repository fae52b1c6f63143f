//! Wrap-around grid layout on the torus.
//!
//! Slot `(i, j)` of a `width × height` grid sits at
//! `theta = i·2π/width`, `phi = j·2π/height`. Each slot links to the slot on
//! its right and the slot below it, wrapping at the edges, so every slot
//! ends up with 4 neighbors once all links are applied in both directions.

use crate::{Error, Result, TorusCoord, GRID_DEGREE, PERIOD};

/// A slot in a toroidal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSlot {
    /// Column (theta direction).
    pub i: usize,
    /// Row (phi direction).
    pub j: usize,
}

impl GridSlot {
    /// Create a new slot.
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl std::fmt::Display for GridSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// A `width × height` lattice with wrap-around in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorusGrid {
    width: usize,
    height: usize,
}

impl TorusGrid {
    /// Create a grid. Both dimensions must be non-zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always false: dimensions are checked on construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether a slot lies inside the grid.
    pub fn contains(&self, slot: GridSlot) -> bool {
        slot.i < self.width && slot.j < self.height
    }

    /// All slots, column-major (`(0,0), (0,1), ...`).
    pub fn slots(&self) -> impl Iterator<Item = GridSlot> + '_ {
        (0..self.width).flat_map(move |i| (0..self.height).map(move |j| GridSlot::new(i, j)))
    }

    /// Torus coordinate of a slot.
    pub fn coord_of(&self, slot: GridSlot) -> TorusCoord {
        TorusCoord::new(
            slot.i as f64 * PERIOD / self.width as f64,
            slot.j as f64 * PERIOD / self.height as f64,
        )
    }

    /// Slot to the right, wrapping at the last column.
    pub fn right_of(&self, slot: GridSlot) -> GridSlot {
        GridSlot::new((slot.i + 1) % self.width, slot.j)
    }

    /// Slot below, wrapping at the last row.
    pub fn down_of(&self, slot: GridSlot) -> GridSlot {
        GridSlot::new(slot.i, (slot.j + 1) % self.height)
    }

    /// The 4 neighbors of a slot: right, left, down, up.
    pub fn neighbors_of(&self, slot: GridSlot) -> [GridSlot; GRID_DEGREE] {
        [
            self.right_of(slot),
            GridSlot::new((slot.i + self.width - 1) % self.width, slot.j),
            self.down_of(slot),
            GridSlot::new(slot.i, (slot.j + self.height - 1) % self.height),
        ]
    }

    /// Every undirected link of the grid, exactly once per (slot, direction).
    ///
    /// Yields `2 · width · height` pairs. Grids narrower than 3 in a
    /// direction produce repeated pairs or self-links in that direction.
    pub fn links(&self) -> impl Iterator<Item = (GridSlot, GridSlot)> + '_ {
        self.slots()
            .flat_map(move |slot| [(slot, self.right_of(slot)), (slot, self.down_of(slot))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            TorusGrid::new(0, 4),
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        );
        assert!(TorusGrid::new(4, 0).is_err());
    }

    #[test]
    fn slot_count() {
        let grid = TorusGrid::new(10, 10).unwrap();
        assert_eq!(grid.len(), 100);
        assert_eq!(grid.slots().count(), 100);

        let unique: HashSet<_> = grid.slots().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn link_count_is_twice_slots() {
        let grid = TorusGrid::new(10, 7).unwrap();
        assert_eq!(grid.links().count(), 2 * 70);
    }

    #[test]
    fn every_slot_has_degree_four() {
        let grid = TorusGrid::new(5, 6).unwrap();
        let mut degree: HashMap<GridSlot, usize> = HashMap::new();
        for (a, b) in grid.links() {
            *degree.entry(a).or_default() += 1;
            *degree.entry(b).or_default() += 1;
        }

        assert_eq!(degree.len(), grid.len());
        assert!(degree.values().all(|&d| d == GRID_DEGREE));
    }

    #[test]
    fn edges_wrap_around() {
        let grid = TorusGrid::new(10, 10).unwrap();
        let corner = GridSlot::new(9, 9);

        assert_eq!(grid.right_of(corner), GridSlot::new(0, 9));
        assert_eq!(grid.down_of(corner), GridSlot::new(9, 0));

        let neighbors = grid.neighbors_of(GridSlot::new(0, 0));
        assert!(neighbors.contains(&GridSlot::new(9, 0)));
        assert!(neighbors.contains(&GridSlot::new(0, 9)));
    }

    #[test]
    fn coordinates_spread_over_period() {
        let grid = TorusGrid::new(4, 8).unwrap();

        assert_eq!(grid.coord_of(GridSlot::new(0, 0)), TorusCoord::ORIGIN);
        let c = grid.coord_of(GridSlot::new(2, 4));
        assert!((c.theta - std::f64::consts::PI).abs() < 1e-12);
        assert!((c.phi - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn adjacent_slots_are_close() {
        let grid = TorusGrid::new(10, 10).unwrap();
        let geometry = crate::TorusGeometry::default();

        let origin = grid.coord_of(GridSlot::new(0, 0));
        let wrapped = grid.coord_of(GridSlot::new(9, 0));
        let opposite = grid.coord_of(GridSlot::new(5, 0));

        assert!(geometry.distance(&origin, &wrapped) < geometry.distance(&origin, &opposite));
    }
}
