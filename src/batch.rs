use std::fmt::Debug;
use std::ops::{Add, BitAnd, Mul, Sub};

use bytemuck::Pod;
use num::ToPrimitive;
use wide::{f32x8, f64x4, i32x8, i64x4, CmpLe};

/// Views a batch as a slice of its lanes.
pub fn lanes<B: Pod, L: Pod>(batch: &B) -> &[L] {
    bytemuck::cast_slice(std::slice::from_ref(batch))
}

/// Views a batch as a mutable slice of its lanes.
pub fn lanes_mut<B: Pod, L: Pod>(batch: &mut B) -> &mut [L] {
    bytemuck::cast_slice_mut(std::slice::from_mut(batch))
}

/// Integer batch. Serves both as the per-lane counter batch and as the
/// lane mask produced by comparisons (all bits set = true, zero = false).
pub trait IntBatch:
    Copy
    + Default
    + Debug
    + Pod
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + BitAnd<Output = Self>
    + 'static
{
    type Lane: Pod + Default + PartialEq + ToPrimitive + Debug;
    const LANES: usize;

    fn splat(value: Self::Lane) -> Self;

    /// Mask with every lane true.
    fn all_set() -> Self;

    /// True when no lane of the mask is set.
    fn none(&self) -> bool {
        lanes::<Self, Self::Lane>(self)
            .iter()
            .all(|lane| *lane == Self::Lane::default())
    }

    /// Counter value of a lane. Counters are never negative.
    fn count(&self, lane: usize) -> u32 {
        lanes::<Self, Self::Lane>(self)[lane].to_u32().unwrap_or(0)
    }
}

macro_rules! impl_int_batch {
    ($batch:ty, $lane:ty, $n:expr) => {
        impl IntBatch for $batch {
            type Lane = $lane;
            const LANES: usize = $n;

            fn splat(value: $lane) -> Self {
                <$batch>::splat(value)
            }

            fn all_set() -> Self {
                <$batch>::splat(-1)
            }
        }
    };
}

impl_int_batch!(i32x8, i32, 8);
impl_int_batch!(i64x4, i64, 4);

/// Arithmetic batch holding one coordinate component per lane.
pub trait Batch:
    Copy
    + Default
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + 'static
{
    /// Integer batch with the same lane count, used for masks and counters.
    type Mask: IntBatch;
    const LANES: usize;

    /// Lane-wise `self <= bound`.
    fn within(self, bound: Self) -> Self::Mask;
}

macro_rules! impl_float_batch {
    ($batch:ty, $mask:ty, $n:expr) => {
        impl Batch for $batch {
            type Mask = $mask;
            const LANES: usize = $n;

            fn within(self, bound: Self) -> $mask {
                bytemuck::cast(self.cmp_le(bound))
            }
        }
    };
}

impl_float_batch!(f32x8, i32x8, 8);
impl_float_batch!(f64x4, i64x4, 4);
