use crate::batch::{Batch, IntBatch};
use crate::scalar::Scalar;

pub const ESCAPE_RADIUS: i32 = 2;

/// Escape-time iteration over every lane of a batch at once.
///
/// Returns, per lane, the number of iterations `z` stayed within
/// `|z|^2 <= radius_sq`, capped at `limit`. All lanes are stepped in
/// lockstep; a lane that has escaped keeps computing but its mask stays
/// clear, so its counter is frozen.
pub fn escape_counts<B: Batch>(c_re: B, c_im: B, radius_sq: B, limit: u32) -> B::Mask {
    let mut counters = B::Mask::default();
    let mut confined = B::Mask::all_set();
    let mut x = c_re;
    let mut y = c_im;

    for _ in 0..limit {
        let xx = x * x;
        let yy = y * y;

        confined = (xx + yy).within(radius_sq) & confined;
        if confined.none() {
            break;
        }

        // mask lanes are -1 where set
        counters = counters - confined;

        let xy = x * y;
        y = xy + xy + c_im;
        x = xx - yy + c_re;
    }

    counters
}

/// `escape_counts` with the escape radius expressed in `S`.
pub fn calculate<S: Scalar>(
    c_re: S::Batch,
    c_im: S::Batch,
    limit: u32,
) -> <S::Batch as Batch>::Mask {
    let radius = S::from_int(ESCAPE_RADIUS);
    escape_counts(c_re, c_im, S::splat(radius * radius), limit)
}
