#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod grid;
pub mod output;
pub mod pipeline;
pub mod types;

// Core machinery – public for tooling and benchmarks, but considered
// unstable internals.
pub mod cell;
pub mod filtration;

// --- High-level re-exports -------------------------------------------------

// Main entry points: grid container, engine, results.
pub use crate::grid::DenseGrid;
pub use crate::pipeline::{PersistenceEngine, PersistenceParams, RunOutput, RunSummary};
pub use crate::types::{LocationMode, Method, PersistencePair};

// Convenience I/O helpers.
pub use crate::grid::io::load_grid;
pub use crate::output::write_diagram;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use cubical_persistence::prelude::*;
///
/// let grid = load_grid("volume.npy".as_ref(), f64::INFINITY).unwrap();
/// let engine = PersistenceEngine::new(PersistenceParams::default());
/// let output = engine.run(&grid);
/// println!("{} pairs in {:.3} ms", output.pairs.len(), output.summary.total_ms);
/// ```
pub mod prelude {
    pub use crate::grid::io::load_grid;
    pub use crate::output::write_diagram;
    pub use crate::{
        DenseGrid, LocationMode, Method, PersistenceEngine, PersistenceParams, PersistencePair,
    };
}
