//! Tiling of 2-D points into batches.
//!
//! A block is a `width x height` rectangle of points stored in one batch,
//! row by row. Both sides are powers of two and together fill the batch
//! exactly, so point <-> (block, lane) conversion is shifts and masks.

use crate::coord::Resolution;
use crate::error::LayoutError;

/// `log2(n)` for a power of two.
pub const fn log2(n: usize) -> Result<u32, LayoutError> {
    if n == 0 {
        Err(LayoutError::Empty)
    } else if n & (n - 1) != 0 {
        Err(LayoutError::NotPowerOfTwo(n))
    } else {
        Ok(n.trailing_zeros())
    }
}

/// Number of `2^shift` sized steps needed to cover `total`.
pub const fn num_steps(total: usize, shift: u32) -> usize {
    let mask = (1 << shift) - 1;
    (total + mask) >> shift
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    lanes: usize,
    width_shift: u32,
    height_shift: u32,
}

impl BlockLayout {
    /// Layout for a batch of `lanes` lanes. When `log2(lanes)` is odd the
    /// extra factor of two goes to the width.
    pub const fn for_lanes(lanes: usize) -> Result<Self, LayoutError> {
        let shift = match log2(lanes) {
            Ok(shift) => shift,
            Err(e) => return Err(e),
        };
        let height_shift = shift / 2;
        let width_shift = shift - height_shift;

        let width = 1 << width_shift;
        let height = 1 << height_shift;
        if width * height != lanes {
            return Err(LayoutError::Misfit {
                lanes,
                width,
                height,
            });
        }

        Ok(Self {
            lanes,
            width_shift,
            height_shift,
        })
    }

    pub const fn lanes(&self) -> usize {
        self.lanes
    }

    pub const fn width_shift(&self) -> u32 {
        self.width_shift
    }

    pub const fn height_shift(&self) -> u32 {
        self.height_shift
    }

    pub const fn width(&self) -> usize {
        1 << self.width_shift
    }

    pub const fn height(&self) -> usize {
        1 << self.height_shift
    }

    pub const fn width_mask(&self) -> usize {
        self.width() - 1
    }

    pub const fn height_mask(&self) -> usize {
        self.height() - 1
    }

    /// Block coordinates `(block_row, block_col)` owning a point.
    pub const fn block_of(&self, row: usize, col: usize) -> (usize, usize) {
        (row >> self.height_shift, col >> self.width_shift)
    }

    /// Lane holding a point within its block.
    pub const fn lane_of(&self, row: usize, col: usize) -> usize {
        ((row & self.height_mask()) << self.width_shift) | (col & self.width_mask())
    }

    /// Offset `(row, col)` inside a block of a given lane.
    pub const fn offset_of(&self, lane: usize) -> (usize, usize) {
        (lane >> self.width_shift, lane & self.width_mask())
    }

    /// Inverse of `block_of` + `lane_of`.
    pub const fn point_of(&self, block_row: usize, block_col: usize, lane: usize) -> (usize, usize) {
        let (row, col) = self.offset_of(lane);
        (
            (block_row << self.height_shift) + row,
            (block_col << self.width_shift) + col,
        )
    }
}

/// Blocks needed to cover a resolution; edge blocks may hang over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    pub columns: usize,
    pub rows: usize,
}

impl BlockGrid {
    pub fn covering(resolution: Resolution, layout: &BlockLayout) -> Self {
        Self {
            columns: num_steps(resolution.width, layout.width_shift),
            rows: num_steps(resolution.height, layout.height_shift),
        }
    }

    pub fn num_blocks(&self) -> usize {
        self.columns * self.rows
    }

    pub fn index(&self, block_row: usize, block_col: usize) -> usize {
        block_row * self.columns + block_col
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_layout_fills_batch() {
        for shift in 0..12 {
            let lanes = 1 << shift;
            let layout = BlockLayout::for_lanes(lanes).unwrap();
            assert_eq!(layout.width() * layout.height(), lanes);
            assert_eq!(layout.width_shift() + layout.height_shift(), shift);
            assert!(layout.width() >= layout.height());
            assert!(layout.width() <= 2 * layout.height());
        }
    }

    #[test]
    fn test_layout_shapes() {
        let eight = BlockLayout::for_lanes(8).unwrap();
        assert_eq!((eight.width(), eight.height()), (4, 2));
        let four = BlockLayout::for_lanes(4).unwrap();
        assert_eq!((four.width(), four.height()), (2, 2));
        let one = BlockLayout::for_lanes(1).unwrap();
        assert_eq!((one.width(), one.height()), (1, 1));
    }

    #[test]
    fn test_bad_lane_counts() {
        assert_eq!(BlockLayout::for_lanes(0), Err(LayoutError::Empty));
        assert_eq!(BlockLayout::for_lanes(6), Err(LayoutError::NotPowerOfTwo(6)));
        assert_eq!(BlockLayout::for_lanes(12), Err(LayoutError::NotPowerOfTwo(12)));
    }

    #[test]
    fn test_num_steps() {
        assert_eq!(num_steps(80, 2), 20);
        assert_eq!(num_steps(81, 2), 21);
        assert_eq!(num_steps(1, 3), 1);
        assert_eq!(num_steps(0, 3), 0);
        assert_eq!(num_steps(7, 0), 7);
    }

    #[test]
    fn test_point_round_trip() {
        for lanes in [1, 2, 4, 8, 16, 32] {
            let layout = BlockLayout::for_lanes(lanes).unwrap();
            let resolution = Resolution::new(37, 13);
            let grid = BlockGrid::covering(resolution, &layout);
            let mut seen = vec![false; grid.num_blocks() * lanes];
            for row in 0..resolution.height {
                for col in 0..resolution.width {
                    let (block_row, block_col) = layout.block_of(row, col);
                    let lane = layout.lane_of(row, col);
                    assert!(block_row < grid.rows && block_col < grid.columns);
                    assert!(lane < lanes);
                    assert_eq!(layout.point_of(block_row, block_col, lane), (row, col));

                    let slot = grid.index(block_row, block_col) * lanes + lane;
                    assert!(!seen[slot], "two points share a lane");
                    seen[slot] = true;
                }
            }
        }
    }
}
