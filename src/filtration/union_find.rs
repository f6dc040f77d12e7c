//! Birth-weighted disjoint sets over the grid vertices.

use crate::grid::DenseGrid;

/// Path-compressed union-find keyed by linear vertex id.
///
/// Roots carry the birth of the oldest vertex in their component; on a
/// union the root with the smaller birth survives (ties to the smaller id),
/// so a component's root birth never increases.
pub struct UnionFind {
    parent: Vec<usize>,
    birth: Vec<f64>,
}

impl UnionFind {
    pub fn new(grid: &DenseGrid) -> Self {
        let n = grid.vertex_count();
        Self {
            parent: (0..n).collect(),
            birth: (0..n).map(|vid| grid.birth_by_id(vid)).collect(),
        }
    }

    /// Root of `x` with two-pass path compression.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut walk = x;
        while self.parent[walk] != root {
            let next = self.parent[walk];
            self.parent[walk] = root;
            walk = next;
        }
        root
    }

    /// Unite the components of `a` and `b`.
    ///
    /// Returns the losing pre-union root and its birth, or `None` when the
    /// two vertices were already connected.
    pub fn union(&mut self, a: usize, b: usize) -> Option<(usize, f64)> {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return None;
        }
        let winner_is_a = match self.birth[ra].partial_cmp(&self.birth[rb]) {
            Some(std::cmp::Ordering::Less) => true,
            Some(std::cmp::Ordering::Greater) => false,
            _ => ra < rb,
        };
        let (winner, loser) = if winner_is_a { (ra, rb) } else { (rb, ra) };
        self.parent[loser] = winner;
        Some((loser, self.birth[loser]))
    }

    /// Whether `v` is currently the root of its component.
    #[inline]
    pub fn is_root(&self, v: usize) -> bool {
        self.parent[v] == v
    }

    /// Component birth recorded at `v` (meaningful for roots).
    #[inline]
    pub fn birth(&self, v: usize) -> f64 {
        self.birth[v]
    }
}
