//! Coboundary enumeration for cubical cells.
//!
//! For a cell of dimension `d` the iterator yields the `(d+1)`-cells that
//! contain it, each tagged with its induced birth (the maximum over its
//! corner vertices). The candidate set is fixed per `(dim, m)` (at most six
//! cofaces for a vertex, four for an edge, two for a square), and cofaces
//! reaching outside the grid or born at the threshold are skipped. Emission
//! order is fixed by the candidate tables, which keeps runs reproducible.

use crate::cell::BirthCell;
use crate::grid::DenseGrid;

/// Lazy coface sequence of one anchor cell.
pub struct Cofaces<'a> {
    grid: &'a DenseGrid,
    x: i64,
    y: i64,
    z: i64,
    m: u8,
    dim: u8,
    position: u8,
}

impl DenseGrid {
    /// Enumerate the cofaces of `cell` in candidate-table order.
    pub fn cofaces(&self, cell: BirthCell) -> Cofaces<'_> {
        let (x, y, z, m) = self.unpack(cell.index);
        Cofaces {
            grid: self,
            x,
            y,
            z,
            m,
            dim: cell.dim,
            position: 0,
        }
    }
}

impl Cofaces<'_> {
    /// Anchor of the coface candidate at `position`, or `None` when the
    /// table is exhausted.
    fn candidate(&self, position: u8) -> Option<(i64, i64, i64, u8)> {
        let (x, y, z) = (self.x, self.y, self.z);
        let anchor = match self.dim {
            // vertex -> six incident edges, z/y/x axes, positive side first
            0 => match position {
                0 => (x, y, z, 2),
                1 => (x, y, z - 1, 2),
                2 => (x, y, z, 1),
                3 => (x, y - 1, z, 1),
                4 => (x, y, z, 0),
                5 => (x - 1, y, z, 0),
                _ => return None,
            },
            // edge -> four squares sharing it
            1 => match (self.m, position) {
                (0, 0) => (x, y, z, 1),
                (0, 1) => (x, y, z - 1, 1),
                (0, 2) => (x, y, z, 0),
                (0, 3) => (x, y - 1, z, 0),
                (1, 0) => (x, y, z, 2),
                (1, 1) => (x, y, z - 1, 2),
                (1, 2) => (x, y, z, 0),
                (1, 3) => (x - 1, y, z, 0),
                (2, 0) => (x, y, z, 2),
                (2, 1) => (x, y - 1, z, 2),
                (2, 2) => (x, y, z, 1),
                (2, 3) => (x - 1, y, z, 1),
                _ => return None,
            },
            // square -> the two cubes stacked along its normal
            2 => match (self.m, position) {
                (0, 0) => (x, y, z, 0),
                (0, 1) => (x, y, z - 1, 0),
                (1, 0) => (x, y, z, 0),
                (1, 1) => (x, y - 1, z, 0),
                (2, 0) => (x, y, z, 0),
                (2, 1) => (x - 1, y, z, 0),
                _ => return None,
            },
            _ => return None,
        };
        Some(anchor)
    }
}

impl Iterator for Cofaces<'_> {
    type Item = BirthCell;

    fn next(&mut self) -> Option<BirthCell> {
        while let Some((cx, cy, cz, cm)) = self.candidate(self.position) {
            self.position += 1;
            let birth = self.grid.cell_birth(cx, cy, cz, cm, self.dim + 1);
            if birth < self.grid.threshold() {
                return Some(BirthCell::new(
                    birth,
                    self.grid.pack(cx, cy, cz, cm),
                    self.dim + 1,
                ));
            }
        }
        None
    }
}
