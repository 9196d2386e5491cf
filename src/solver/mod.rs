use std::ops::Range;
use std::time::Instant;

use log::{debug, trace};

use crate::batch::Batch;
use crate::coord::Geometry;
use crate::error::{Error, Result};
use crate::layout::{BlockGrid, BlockLayout};
use crate::scalar::Scalar;
use crate::threads::{Call, Join, RangeSplitter, Split, WorkerPool};

pub mod coords;
pub mod extract;
pub mod kernel;

pub use coords::{generate_coordinates, Coordinates};
pub use extract::{extract_results, IterationMap};
pub use kernel::{calculate, escape_counts, ESCAPE_RADIUS};

/// Counter batch of a representation.
pub type Counters<S> = <<S as Scalar>::Batch as Batch>::Mask;

/// Largest iteration limit; counters are 32-bit signed lanes at their narrowest.
pub const MAX_ITERATIONS: u32 = i32::MAX as u32;

/// Magnitude a representation must hold: the squared escape radius plus
/// room for the squares computed on the way there.
pub const ESCAPE_HEADROOM: f64 = 8.0;

pub fn check_limit(limit: u32) -> Result<()> {
    if limit == 0 || limit > MAX_ITERATIONS {
        return Err(Error::Limit(limit));
    }
    Ok(())
}

pub fn check_range<S: Scalar>() -> Result<()> {
    let max = S::max_magnitude();
    if max < ESCAPE_HEADROOM {
        return Err(Error::Range {
            max,
            required: ESCAPE_HEADROOM,
        });
    }
    Ok(())
}

/// A range of block rows to generate, with everything needed to do so.
#[derive(Clone, Debug)]
pub struct BlockJob<S> {
    pub geometry: Geometry<S>,
    pub layout: BlockLayout,
    pub grid: BlockGrid,
    pub limit: u32,
    pub block_rows: Range<usize>,
}

impl<S: Scalar> BlockJob<S> {
    /// Validates the whole configuration and covers every block row.
    pub fn new(geometry: Geometry<S>, limit: u32) -> Result<Self> {
        check_limit(limit)?;
        let layout = BlockLayout::for_lanes(S::LANES)?;
        check_range::<S>()?;
        geometry.validate()?;

        let grid = BlockGrid::covering(geometry.resolution, &layout);
        debug!(
            "{}x{} points in {}x{} blocks of {}x{} lanes",
            geometry.resolution.width,
            geometry.resolution.height,
            grid.columns,
            grid.rows,
            layout.width(),
            layout.height(),
        );
        Ok(Self {
            geometry,
            layout,
            grid,
            limit,
            block_rows: 0..grid.rows,
        })
    }

    pub fn num_blocks(&self) -> usize {
        self.block_rows.len() * self.grid.columns
    }
}

impl<S> Split for BlockJob<S>
where
    S: Scalar,
{
    fn split_to_vec(self, n: usize) -> Vec<Self> {
        RangeSplitter::split(self.block_rows.start, self.block_rows.end, n)
            .into_iter()
            .filter(|(start, end)| start < end)
            .map(|(start, end)| Self {
                block_rows: start..end,
                ..self.clone()
            })
            .collect()
    }
}

/// Counter batches for a contiguous range of block rows.
#[derive(Clone, Debug)]
pub struct BlockCounters<M> {
    pub block_rows: Range<usize>,
    pub counters: Vec<M>,
}

impl<M> Join for BlockCounters<M> {
    fn join_vec(parts: Vec<Self>) -> Self {
        let start = parts.first().map_or(0, |part| part.block_rows.start);
        let mut end = start;
        let mut counters = Vec::with_capacity(parts.iter().map(|p| p.counters.len()).sum());
        for part in parts {
            debug_assert_eq!(part.block_rows.start, end, "parts out of order");
            end = part.block_rows.end;
            counters.extend(part.counters);
        }
        Self {
            block_rows: start..end,
            counters,
        }
    }
}

pub trait Solver<S: Scalar> {
    fn solve(&self, job: BlockJob<S>) -> Result<BlockCounters<Counters<S>>>;

    fn threaded(self, n: usize) -> WorkerPool<BlockJob<S>, Result<BlockCounters<Counters<S>>>>
    where
        Self: Clone + Send + Sized + 'static,
    {
        WorkerPool::with(n, || {
            let solver = self.clone();
            move |job: BlockJob<S>| solver.solve(job)
        })
    }
}

impl<S: Scalar> Solver<S> for WorkerPool<BlockJob<S>, Result<BlockCounters<Counters<S>>>> {
    fn solve(&self, job: BlockJob<S>) -> Result<BlockCounters<Counters<S>>> {
        self.call(job)?
    }
}

/// Generates and iterates one block at a time on the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlockSolver;

impl<S: Scalar> Solver<S> for BlockSolver {
    fn solve(&self, job: BlockJob<S>) -> Result<BlockCounters<Counters<S>>> {
        trace!("solving block rows {:?}", job.block_rows);
        let start = Instant::now();

        let coords = generate_coordinates(
            &job.geometry,
            &job.layout,
            &job.grid,
            job.block_rows.clone(),
        );
        let counters: Vec<Counters<S>> = coords
            .iter()
            .map(|(c_re, c_im)| calculate::<S>(*c_re, *c_im, job.limit))
            .collect();

        trace!(
            "block rows {:?}: {} blocks in {:?}",
            job.block_rows,
            counters.len(),
            start.elapsed()
        );
        Ok(BlockCounters {
            block_rows: job.block_rows,
            counters,
        })
    }
}
