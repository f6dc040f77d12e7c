//! Orchestration of the persistence pipeline.
//!
//! The [`PersistenceEngine`] chains the stages selected by
//! [`PersistenceParams`]:
//!
//! - `link_find`: union-find sweep for dimension 0, then matrix reduction
//!   for dimensions 1 and 2. The positive edges left over by the sweep are
//!   the dimension-1 columns, and the pivots claimed in dimension `d` are
//!   excluded from the dimension `d+1` assembly.
//! - `compute_pairs`: matrix reduction for every dimension, starting from
//!   the vertex columns.
//! - `top_dim`: the dual-graph sweep on a negated, padded embedding of the
//!   grid, reporting only the top dimension.

mod options;

pub use options::PersistenceParams;

use std::time::Instant;

use log::info;
use serde::Serialize;

use crate::filtration::link_find;
use crate::filtration::ColumnReduction;
use crate::grid::DenseGrid;
use crate::types::{Method, PersistencePair};

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Pair count for one homology dimension.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimCount {
    pub dim: u8,
    pub pairs: usize,
}

/// Machine-readable summary of a run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub grid_extents: [usize; 3],
    pub grid_dim: u8,
    pub method: Method,
    pub maxdim: u8,
    pub threshold: f64,
    pub total_pairs: usize,
    pub pair_counts: Vec<DimCount>,
    pub apparent_pairs: usize,
    pub stages: Vec<StageTiming>,
    pub total_ms: f64,
}

/// Diagram plus summary produced by one engine run.
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub pairs: Vec<PersistencePair>,
    pub summary: RunSummary,
}

/// Persistence pipeline bound to a parameter set.
pub struct PersistenceEngine {
    params: PersistenceParams,
}

/// Axis-edge slots enumerated by the standard filtration.
fn standard_edge_types(dim: u8) -> &'static [u8] {
    match dim {
        1 => &[0],
        2 => &[0, 1],
        _ => &[0, 1, 2],
    }
}

/// Edge slots of the dual graph: axis edges plus every diagonal.
fn dual_edge_types(dim: u8) -> &'static [u8] {
    match dim {
        1 => &[0],
        2 => &[0, 1, 3, 4],
        _ => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
    }
}

impl PersistenceEngine {
    pub fn new(params: PersistenceParams) -> Self {
        Self { params }
    }

    /// Compute the persistence diagram of `grid`.
    pub fn run(&self, grid: &DenseGrid) -> RunOutput {
        let total_start = Instant::now();
        let params = &self.params;
        let maxdim = params.maxdim.min(grid.dim() - 1);

        let mut pairs = Vec::new();
        let mut stages = Vec::new();
        let mut apparent_pairs = 0;
        let stage = |label: &str, start: Instant, stages: &mut Vec<StageTiming>| {
            stages.push(StageTiming {
                label: label.to_string(),
                elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
            });
        };

        match params.method {
            Method::LinkFind => {
                let start = Instant::now();
                let mut edges = link_find::enum_edges(grid, standard_edge_types(grid.dim()));
                link_find::sweep(grid, &mut edges, 0, params.location, false, &mut pairs);
                stage("dim 0 sweep", start, &mut stages);

                if maxdim > 0 {
                    let mut reduction =
                        ColumnReduction::new(grid, params.min_cache_size, params.location);
                    let start = Instant::now();
                    reduction.reduce(&edges, 1, &mut pairs);
                    stage("dim 1 reduction", start, &mut stages);
                    if maxdim > 1 {
                        let start = Instant::now();
                        let columns = reduction.assemble_columns(2);
                        reduction.reduce(&columns, 2, &mut pairs);
                        stage("dim 2 reduction", start, &mut stages);
                    }
                    apparent_pairs = reduction.apparent_pairs();
                }
            }
            Method::ComputePairs => {
                let mut reduction =
                    ColumnReduction::new(grid, params.min_cache_size, params.location);
                for dim in 0..=maxdim {
                    let start = Instant::now();
                    let columns = reduction.assemble_columns(dim);
                    reduction.reduce(&columns, dim, &mut pairs);
                    stage(&format!("dim {dim} reduction"), start, &mut stages);
                }
                apparent_pairs = reduction.apparent_pairs();
            }
            Method::TopDim => {
                let start = Instant::now();
                let dual = grid.to_dual_embedding();
                stage("dual embedding", start, &mut stages);

                let start = Instant::now();
                let dim_emit = grid.dim() - 1;
                let mut edges = link_find::enum_edges(&dual, dual_edge_types(dual.dim()));
                link_find::sweep(&dual, &mut edges, dim_emit, params.location, true, &mut pairs);
                stage("dual sweep", start, &mut stages);
            }
        }

        let mut counts = [0usize; 4];
        for pair in &pairs {
            counts[pair.dim as usize] += 1;
        }
        let pair_counts: Vec<DimCount> = counts
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(dim, &n)| DimCount {
                dim: dim as u8,
                pairs: n,
            })
            .collect();
        for count in &pair_counts {
            info!("pairs in dim {}: {}", count.dim, count.pairs);
        }

        let summary = RunSummary {
            grid_extents: [grid.ax(), grid.ay(), grid.az()],
            grid_dim: grid.dim(),
            method: params.method,
            maxdim,
            threshold: grid.threshold(),
            total_pairs: pairs.len(),
            pair_counts,
            apparent_pairs,
            stages,
            total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
        };
        RunOutput { pairs, summary }
    }
}
