//! Coboundary-matrix reduction over ℤ/2.
//!
//! Columns are the cells of one dimension, sorted youngest-first; each
//! column's working coboundary is a [`BinaryHeap`] of its cofaces. The pivot
//! of a column is the heap top after ℤ/2 cancellation of duplicate entries.
//! Three devices keep the reduction fast:
//!
//! - the apparent-pair shortcut pairs a column with the first coface sharing
//!   its birth, before any heap is built;
//! - the pivot-column index maps a claimed pivot back to the column that
//!   owns it, so a collision turns into another round of additions;
//! - reduced working coboundaries are recorded and replayed whenever a later
//!   column collides with the same pivot, instead of being recomputed.

use std::collections::{BinaryHeap, HashMap};

use log::debug;
use rayon::prelude::*;

use crate::cell::BirthCell;
use crate::grid::DenseGrid;
use crate::types::{LocationMode, PersistencePair};

/// Column-by-column reduction state for one grid.
///
/// The pivot-column index survives between [`reduce`](Self::reduce) calls:
/// the pivots claimed while reducing dimension `d` are exactly the
/// `(d+1)`-cells that [`assemble_columns`](Self::assemble_columns) must skip
/// when it gathers the next dimension's columns.
pub struct ColumnReduction<'a> {
    grid: &'a DenseGrid,
    pivot_column_index: HashMap<i64, usize>,
    min_cache_size: usize,
    location: LocationMode,
    apparent_pairs: usize,
}

impl<'a> ColumnReduction<'a> {
    pub fn new(grid: &'a DenseGrid, min_cache_size: usize, location: LocationMode) -> Self {
        Self {
            grid,
            pivot_column_index: HashMap::new(),
            min_cache_size,
            location,
            apparent_pairs: 0,
        }
    }

    /// Columns paired through the apparent-pair shortcut, with no heap
    /// built at all.
    pub fn apparent_pairs(&self) -> usize {
        self.apparent_pairs
    }

    /// Gather the cells of dimension `dim` that still need reducing,
    /// sorted youngest-first.
    ///
    /// For `dim >= 1` any cell already claimed as a pivot by the previous
    /// dimension's reduction is skipped.
    pub fn assemble_columns(&self, dim: u8) -> Vec<BirthCell> {
        let grid = self.grid;
        let mut columns = Vec::new();
        if dim == 0 {
            for z in 0..grid.az() as i64 {
                for y in 0..grid.ay() as i64 {
                    for x in 0..grid.ax() as i64 {
                        let birth = grid.vertex_birth(x, y, z);
                        if birth < grid.threshold() {
                            columns.push(BirthCell::new(birth, grid.pack(x, y, z, 0), 0));
                        }
                    }
                }
            }
        } else {
            for z in 0..grid.az() as i64 {
                for y in 0..grid.ay() as i64 {
                    for x in 0..grid.ax() as i64 {
                        for m in 0..3u8 {
                            let index = grid.pack(x, y, z, m);
                            if self.pivot_column_index.contains_key(&index) {
                                continue;
                            }
                            let birth = grid.cell_birth(x, y, z, m, dim);
                            if birth < grid.threshold() {
                                columns.push(BirthCell::new(birth, index, dim));
                            }
                        }
                    }
                }
            }
        }
        columns.par_sort_unstable();
        columns
    }

    /// Reduce `columns` (cells of dimension `dim`), appending persistence
    /// pairs to `pairs`.
    pub fn reduce(&mut self, columns: &[BirthCell], dim: u8, pairs: &mut Vec<PersistencePair>) {
        self.pivot_column_index.clear();
        self.pivot_column_index.reserve(columns.len());
        let mut recorded: HashMap<usize, BinaryHeap<BirthCell>> = HashMap::new();
        let mut coface_entries: Vec<BirthCell> = Vec::new();

        for i in 0..columns.len() {
            let column = columns[i];
            let mut working: BinaryHeap<BirthCell> = BinaryHeap::new();
            let mut j = i;
            let mut might_be_apparent = true;

            loop {
                coface_entries.clear();
                let mut apparent: Option<BirthCell> = None;
                for coface in self.grid.cofaces(columns[j]) {
                    coface_entries.push(coface);
                    if might_be_apparent && coface.birth == columns[j].birth {
                        if self.pivot_column_index.contains_key(&coface.index) {
                            might_be_apparent = false;
                        } else {
                            apparent = Some(coface);
                            break;
                        }
                    }
                }

                if let Some(pivot) = apparent {
                    if working.is_empty() {
                        self.apparent_pairs += 1;
                    }
                    self.emit(pairs, dim, column, pivot.birth, Some(pivot));
                    self.pivot_column_index.insert(pivot.index, i);
                    break;
                }

                match recorded.get(&j) {
                    Some(saved) => working.extend(saved.iter().copied()),
                    None => working.extend(coface_entries.iter().copied()),
                }

                match get_pivot(&mut working) {
                    Some(pivot) => {
                        if let Some(&owner) = self.pivot_column_index.get(&pivot.index) {
                            j = owner;
                            continue;
                        }
                        if working.len() >= self.min_cache_size {
                            recorded.insert(i, std::mem::take(&mut working));
                        }
                        self.emit(pairs, dim, column, pivot.birth, Some(pivot));
                        self.pivot_column_index.insert(pivot.index, i);
                    }
                    None => {
                        // fully cancelled: the class survives to the threshold
                        if column.birth != self.grid.threshold() {
                            self.emit(pairs, dim, column, self.grid.threshold(), None);
                        }
                    }
                }
                break;
            }
        }
        debug!(
            "reduced {} columns in dim {}, {} apparent so far",
            columns.len(),
            dim,
            self.apparent_pairs
        );
    }

    fn emit(
        &self,
        pairs: &mut Vec<PersistencePair>,
        dim: u8,
        birth_cell: BirthCell,
        death: f64,
        death_cell: Option<BirthCell>,
    ) {
        if birth_cell.birth == death {
            return;
        }
        let located = match (self.location, death_cell) {
            (LocationMode::Death, Some(cell)) => cell,
            _ => birth_cell,
        };
        let (x, y, z) = self.grid.cell_location(located.index);
        pairs.push(PersistencePair::new(dim, birth_cell.birth, death, x, y, z));
    }
}

/// Pop the pivot of a working coboundary, cancelling ℤ/2 duplicates.
///
/// Equal-index entries always sit adjacently at the top of the heap (equal
/// index implies equal birth), so pairs of them annihilate; an odd count
/// leaves one survivor, which is returned without being re-inserted.
pub fn pop_pivot(column: &mut BinaryHeap<BirthCell>) -> Option<BirthCell> {
    let mut pivot = column.pop()?;
    while let Some(top) = column.peek() {
        if top.index != pivot.index {
            return Some(pivot);
        }
        column.pop();
        pivot = column.pop()?;
    }
    Some(pivot)
}

/// Like [`pop_pivot`], but leaves the surviving pivot in the heap.
pub fn get_pivot(column: &mut BinaryHeap<BirthCell>) -> Option<BirthCell> {
    let pivot = pop_pivot(column);
    if let Some(cell) = pivot {
        column.push(cell);
    }
    pivot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DenseGrid;

    #[test]
    fn pop_pivot_cancels_duplicate_entries() {
        let mut heap = BinaryHeap::new();
        heap.push(BirthCell::new(1.0, 4, 2));
        heap.push(BirthCell::new(1.0, 4, 2));
        assert!(pop_pivot(&mut heap).is_none());

        heap.push(BirthCell::new(1.0, 4, 2));
        heap.push(BirthCell::new(1.0, 4, 2));
        heap.push(BirthCell::new(1.0, 4, 2));
        let pivot = pop_pivot(&mut heap).unwrap();
        assert_eq!(pivot.index, 4);
        assert!(heap.is_empty());
    }

    #[test]
    fn get_pivot_keeps_the_survivor() {
        let mut heap = BinaryHeap::new();
        heap.push(BirthCell::new(2.0, 9, 2));
        heap.push(BirthCell::new(1.0, 3, 2));
        heap.push(BirthCell::new(1.0, 3, 2));
        let pivot = get_pivot(&mut heap).unwrap();
        assert_eq!(pivot.index, 9);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn vertex_columns_reproduce_the_union_find_diagram() {
        let grid =
            DenseGrid::from_values(3, 1, 1, f64::INFINITY, vec![0.0, 2.0, 1.0]).unwrap();
        let mut reduction = ColumnReduction::new(&grid, 0, LocationMode::Birth);
        let columns = reduction.assemble_columns(0);
        assert_eq!(columns.len(), 3);
        let mut pairs = Vec::new();
        reduction.reduce(&columns, 0, &mut pairs);

        let mut summary: Vec<(f64, f64)> = pairs.iter().map(|p| (p.birth, p.death)).collect();
        summary.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(summary, vec![(0.0, f64::INFINITY), (1.0, 2.0)]);
    }

    #[test]
    fn assembly_skips_claimed_pivots() {
        let grid =
            DenseGrid::from_values(2, 2, 1, f64::INFINITY, vec![0.0, 1.0, 1.0, 2.0]).unwrap();
        let mut reduction = ColumnReduction::new(&grid, 0, LocationMode::Birth);
        let vertices = reduction.assemble_columns(0);
        let mut pairs = Vec::new();
        reduction.reduce(&vertices, 0, &mut pairs);
        // three of the four edges died as pivots of the vertex reduction
        let edges = reduction.assemble_columns(1);
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn isolated_minima_yield_one_essential_class_each() {
        let grid = DenseGrid::from_values(3, 1, 1, 5.0, vec![0.0, 9.0, 1.0]).unwrap();
        let mut reduction = ColumnReduction::new(&grid, 0, LocationMode::Birth);
        let columns = reduction.assemble_columns(0);
        assert_eq!(columns.len(), 2);
        let mut pairs = Vec::new();
        reduction.reduce(&columns, 0, &mut pairs);
        let mut births: Vec<f64> = pairs.iter().map(|p| p.birth).collect();
        births.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(births, vec![0.0, 1.0]);
        assert!(pairs.iter().all(|p| p.death == 5.0));
    }

    #[test]
    fn min_cache_size_disables_small_column_caching() {
        // caching is a pure trade of memory for recomputation
        let grid =
            DenseGrid::from_values(3, 3, 1, f64::INFINITY, annulus()).unwrap();
        let run = |cache: usize| {
            let mut reduction = ColumnReduction::new(&grid, cache, LocationMode::Birth);
            let mut pairs = Vec::new();
            let vertices = reduction.assemble_columns(0);
            reduction.reduce(&vertices, 0, &mut pairs);
            let edges = reduction.assemble_columns(1);
            reduction.reduce(&edges, 1, &mut pairs);
            let mut summary: Vec<(u8, f64, f64)> =
                pairs.iter().map(|p| (p.dim, p.birth, p.death)).collect();
            summary.sort_by(|a, b| a.partial_cmp(b).unwrap());
            summary
        };
        assert_eq!(run(0), run(1000));
    }

    fn annulus() -> Vec<f64> {
        vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]
    }
}
