use ndarray::{Array2, ArrayView2};

use crate::batch::IntBatch;
use crate::coord::Resolution;
use crate::layout::{BlockGrid, BlockLayout};

/// Iteration count of every sampled point, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationMap {
    counts: Array2<u32>,
    limit: u32,
}

impl IterationMap {
    pub fn width(&self) -> usize {
        self.counts.ncols()
    }

    pub fn height(&self) -> usize {
        self.counts.nrows()
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Iteration limit the counts were generated with.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn get(&self, col: usize, row: usize) -> u32 {
        self.counts[[row, col]]
    }

    /// True if the point never escaped within the limit.
    pub fn is_confined(&self, col: usize, row: usize) -> bool {
        self.get(col, row) >= self.limit
    }

    /// Counts in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.iter().copied()
    }

    pub fn view(&self) -> ArrayView2<'_, u32> {
        self.counts.view()
    }

    /// Flat row-major buffer, `index = row * width + col`.
    pub fn into_vec(self) -> Vec<u32> {
        self.counts.into_raw_vec()
    }
}

/// Copies every point's lane out of the per-block counter batches.
pub fn extract_results<M: IntBatch>(
    counters: &[M],
    grid: &BlockGrid,
    layout: &BlockLayout,
    resolution: Resolution,
    limit: u32,
) -> IterationMap {
    debug_assert_eq!(counters.len(), grid.num_blocks());
    let counts = Array2::from_shape_fn((resolution.height, resolution.width), |(row, col)| {
        let (block_row, block_col) = layout.block_of(row, col);
        counters[grid.index(block_row, block_col)].count(layout.lane_of(row, col))
    });
    IterationMap { counts, limit }
}
