//! Dimension-0 persistence via a sorted-edge union-find sweep.
//!
//! Edges are walked in ascending birth order; every merge kills the younger
//! of the two components and yields one persistence pair. Edges that merged
//! nothing are left behind in the list: they are exactly the columns the
//! dimension-1 reduction still has to look at.

use log::debug;
use rayon::prelude::*;

use super::union_find::UnionFind;
use crate::cell::BirthCell;
use crate::grid::DenseGrid;
use crate::types::{LocationMode, PersistencePair};

/// Collect every edge cell of the listed types with birth below the
/// threshold. `edge_types` is the set of `m` slots to enumerate: the axis
/// edges for the standard filtration, or the axis-plus-diagonal set of the
/// dual graph.
pub fn enum_edges(grid: &DenseGrid, edge_types: &[u8]) -> Vec<BirthCell> {
    let mut edges = Vec::new();
    for z in 0..grid.az() as i64 {
        for y in 0..grid.ay() as i64 {
            for x in 0..grid.ax() as i64 {
                for &m in edge_types {
                    let birth = grid.cell_birth(x, y, z, m, 1);
                    if birth < grid.threshold() {
                        edges.push(BirthCell::new(birth, grid.pack(x, y, z, m), 1));
                    }
                }
            }
        }
    }
    edges
}

/// Run the union-find sweep over `edges`, appending pairs of dimension
/// `dim_emit` to `pairs`.
///
/// On return `edges` retains only the non-merging (positive) edges, still
/// sorted youngest-first, ready to be reduced as dimension-1 columns.
///
/// With `dual` set the sweep assumes `grid` is a dual embedding: each pair
/// `(b, d)` is emitted as `(-d, -b)` and no essential pairs are reported.
pub fn sweep(
    grid: &DenseGrid,
    edges: &mut Vec<BirthCell>,
    dim_emit: u8,
    location: LocationMode,
    dual: bool,
    pairs: &mut Vec<PersistencePair>,
) {
    edges.par_sort_unstable();
    let mut dset = UnionFind::new(grid);
    let mut merged = vec![false; edges.len()];

    // the sorted list runs youngest-first; the sweep wants ascending births
    for (slot, edge) in edges.iter().enumerate().rev() {
        let (x, y, z, m) = grid.unpack(edge.index);
        let (u, v) = grid.edge_endpoints(x, y, z, m);
        let Some((loser, birth)) = dset.union(u, v) else {
            continue;
        };
        merged[slot] = true;
        if birth == edge.birth {
            continue;
        }
        let root_loc = grid.vertex_location(loser);
        if dual {
            let (x, y, z) = root_loc;
            pairs.push(PersistencePair::new(dim_emit, -edge.birth, -birth, x, y, z));
        } else {
            let (x, y, z) = match location {
                LocationMode::Death => grid.cell_location(edge.index),
                _ => root_loc,
            };
            pairs.push(PersistencePair::new(dim_emit, birth, edge.birth, x, y, z));
        }
    }

    if !dual {
        // one essential class per surviving component
        for vid in 0..grid.vertex_count() {
            if dset.is_root(vid) {
                let birth = dset.birth(vid);
                if birth < grid.threshold() {
                    let (x, y, z) = grid.vertex_location(vid);
                    pairs.push(PersistencePair::new(
                        dim_emit,
                        birth,
                        grid.threshold(),
                        x,
                        y,
                        z,
                    ));
                }
            }
        }
    }

    let total = edges.len();
    let mut slot = 0;
    edges.retain(|_| {
        let keep = !merged[slot];
        slot += 1;
        keep
    });
    debug!(
        "link-find sweep: {} edges, {} merges, {} positive edges retained",
        total,
        total - edges.len(),
        edges.len()
    );
}
