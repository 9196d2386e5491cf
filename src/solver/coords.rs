use std::ops::Range;

use crate::coord::Geometry;
use crate::layout::{BlockGrid, BlockLayout};
use crate::scalar::Scalar;

/// Real and imaginary coordinate batches, one pair per block, in block
/// order (row-major over the block grid).
#[derive(Clone, Debug)]
pub struct Coordinates<B> {
    pub re: Vec<B>,
    pub im: Vec<B>,
}

impl<B> Coordinates<B> {
    pub fn len(&self) -> usize {
        self.re.len()
    }

    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&B, &B)> {
        self.re.iter().zip(self.im.iter())
    }
}

/// Fills the coordinate batches for every block in `block_rows`.
///
/// Lanes of edge blocks that hang over the resolution still get their
/// (well-defined) coordinates; they are never read back.
pub fn generate_coordinates<S: Scalar>(
    geometry: &Geometry<S>,
    layout: &BlockLayout,
    grid: &BlockGrid,
    block_rows: Range<usize>,
) -> Coordinates<S::Batch> {
    let steps = geometry.steps();
    let num_blocks = block_rows.len() * grid.columns;
    let mut re = Vec::with_capacity(num_blocks);
    let mut im = Vec::with_capacity(num_blocks);

    for block_row in block_rows {
        for block_col in 0..grid.columns {
            let mut c_re = S::Batch::default();
            let mut c_im = S::Batch::default();
            for lane in 0..layout.lanes() {
                let (row, col) = layout.point_of(block_row, block_col, lane);
                let point = geometry.point(&steps, row, col);
                S::set(&mut c_re, lane, point.re);
                S::set(&mut c_im, lane, point.im);
            }
            re.push(c_re);
            im.push(c_im);
        }
    }

    Coordinates { re, im }
}
