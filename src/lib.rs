//! Escape-time Mandelbrot generation over SIMD batches.
//!
//! Points are tiled into blocks that exactly fill one batch, every lane of
//! a block is iterated in lockstep, and the per-lane counters are copied
//! back into a row-major [`IterationMap`]. The numeric representation is a
//! type parameter: native `f32`/`f64` or [`fixed::Fixed`] fixed-point.
use std::time::Instant;

use log::debug;

pub mod batch;
pub mod bench;
pub mod complex;
pub mod coord;
pub mod error;
pub mod fixed;
pub mod layout;
pub mod painter;
pub mod scalar;
pub mod solver;
pub mod threads;

pub use crate::coord::{Geometry, Resolution};
pub use crate::error::{Error, Result};
pub use crate::fixed::{Fixed, Fixed32, Fixed64};
pub use crate::scalar::{Representation, Scalar};
pub use crate::solver::{IterationMap, ESCAPE_HEADROOM, MAX_ITERATIONS};

use crate::solver::{extract_results, BlockJob, BlockSolver, Solver};

/// Generator for one representation and iteration limit.
pub struct Mandelbrot<S: Scalar> {
    solver: Box<dyn Solver<S>>,
    limit: u32,
}

impl<S: Scalar> Mandelbrot<S> {
    /// Single-threaded generator.
    pub fn new(limit: u32) -> Result<Self> {
        Self::with_solver(Box::new(BlockSolver), limit)
    }

    /// Generator spreading block rows over `threads` worker threads.
    pub fn threaded(limit: u32, threads: usize) -> Result<Self> {
        let pool = <BlockSolver as Solver<S>>::threaded(BlockSolver, threads);
        Self::with_solver(Box::new(pool), limit)
    }

    /// One worker per physical core.
    pub fn threaded_default(limit: u32) -> Result<Self> {
        Self::threaded(limit, num_cpus::get_physical())
    }

    pub fn with_solver(solver: Box<dyn Solver<S>>, limit: u32) -> Result<Self> {
        solver::check_limit(limit)?;
        solver::check_range::<S>()?;
        Ok(Self { solver, limit })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn generate(&self, geometry: &Geometry<S>) -> Result<IterationMap> {
        let start = Instant::now();
        let job = BlockJob::new(*geometry, self.limit)?;
        let (layout, grid) = (job.layout, job.grid);

        let solved = self.solver.solve(job)?;
        let map = extract_results(
            &solved.counters,
            &grid,
            &layout,
            geometry.resolution,
            self.limit,
        );
        debug!(
            "generated {} points, limit {}, in {:?}",
            geometry.resolution.num_points(),
            self.limit,
            start.elapsed()
        );
        Ok(map)
    }
}

/// Iteration counts for every point of `geometry`, single-threaded.
pub fn generate<S: Scalar>(geometry: &Geometry<S>, limit: u32) -> Result<IterationMap> {
    Mandelbrot::<S>::new(limit)?.generate(geometry)
}

/// Like [`generate`], with the representation picked at run time. A
/// `threads` count of zero generates on the calling thread.
pub fn generate_as(
    representation: Representation,
    geometry: &Geometry<f64>,
    limit: u32,
    threads: usize,
) -> Result<IterationMap> {
    match representation {
        Representation::Float => generate_with::<f32>(geometry, limit, threads),
        Representation::Double => generate_with::<f64>(geometry, limit, threads),
        Representation::Fixed64 => generate_with::<Fixed64>(geometry, limit, threads),
        Representation::Fixed32 => generate_with::<Fixed32>(geometry, limit, threads),
    }
}

fn generate_with<S: Scalar>(
    geometry: &Geometry<f64>,
    limit: u32,
    threads: usize,
) -> Result<IterationMap> {
    let geometry = geometry.convert::<S>()?;
    let mandelbrot = match threads {
        0 => Mandelbrot::<S>::new(limit)?,
        n => Mandelbrot::<S>::threaded(limit, n)?,
    };
    mandelbrot.generate(&geometry)
}
