//! Parameter types configuring a persistence run.

use crate::types::{LocationMode, Method};

/// Run-wide parameters for the persistence pipeline.
///
/// Defaults mirror the CLI: no threshold, homology up to dimension 2
/// (clamped to the grid dimension), the link-find method, and birth-cell
/// locations.
#[derive(Clone, Copy, Debug)]
pub struct PersistenceParams {
    /// Cells born at or above this value are excluded from the filtration.
    pub threshold: f64,
    /// Highest homology dimension to compute; clamped to `grid.dim() - 1`.
    pub maxdim: u8,
    /// Pipeline selection.
    pub method: Method,
    /// Smallest working-column size worth caching during reduction; larger
    /// values trade recomputation for memory.
    pub min_cache_size: usize,
    /// Which cell's coordinates emitted pairs report.
    pub location: LocationMode,
}

impl Default for PersistenceParams {
    fn default() -> Self {
        Self {
            threshold: f64::INFINITY,
            maxdim: 2,
            method: Method::LinkFind,
            min_cache_size: 0,
            location: LocationMode::Birth,
        }
    }
}
