//! Binary fixed-point numbers and batches of them.
//!
//! `Fixed<R, FRAC>` stores a value `v` as the integer `round(v * 2^FRAC)` in
//! `R`. A batch of fixed-point numbers is the integer batch of `R` with the
//! same binary point, so writing one lane writes straight into that integer
//! batch.

use std::fmt::{self, Debug, Display};
use std::ops::{Add, Mul, Sub};

use bytemuck::Pod;
use num::{FromPrimitive, ToPrimitive};
use wide::{i32x8, i64x4};

use crate::batch::{lanes, lanes_mut, Batch, IntBatch};
use crate::layout::BlockLayout;
use crate::scalar::Scalar;

/// Integer storage behind a fixed-point number.
pub trait Raw: Copy + Debug + Default + Ord + Pod + Send + Sync + 'static {
    type Batch: IntBatch<Lane = Self>;
    const BITS: u32;
    const MIN: Self;
    const MAX: Self;
    /// Lane value of a set mask.
    const TRUE: Self;

    fn widen(self) -> i128;

    /// Saturating conversion back from a wide intermediate.
    fn narrow(value: i128) -> Self;
}

macro_rules! impl_raw {
    ($raw:ty, $batch:ty) => {
        impl Raw for $raw {
            type Batch = $batch;
            const BITS: u32 = <$raw>::BITS;
            const MIN: Self = <$raw>::MIN;
            const MAX: Self = <$raw>::MAX;
            const TRUE: Self = -1;

            fn widen(self) -> i128 {
                self as i128
            }

            fn narrow(value: i128) -> Self {
                value.clamp(<$raw>::MIN as i128, <$raw>::MAX as i128) as $raw
            }
        }

        const _: () = assert!(
            BlockLayout::for_lanes(<$batch as IntBatch>::LANES).is_ok(),
            "block does not fit snugly into batch"
        );
    };
}

impl_raw!(i32, i32x8);
impl_raw!(i64, i64x4);

#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<R: Raw, const FRAC: u32> {
    bits: R,
}

/// 64-bit storage, 28 fractional bits.
pub type Fixed64 = Fixed<i64, 28>;
/// 32-bit storage, 24 fractional bits.
pub type Fixed32 = Fixed<i32, 24>;

impl<R: Raw, const FRAC: u32> Fixed<R, FRAC> {
    pub const fn from_bits(bits: R) -> Self {
        Self { bits }
    }

    pub fn to_bits(self) -> R {
        self.bits
    }

    fn one() -> f64 {
        2f64.powi(FRAC as i32)
    }

    fn from_wide(value: i128) -> Self {
        Self::from_bits(R::narrow(value))
    }

    /// Number of integer (non-sign, non-fraction) bits.
    pub fn integer_bits() -> i64 {
        R::BITS as i64 - 1 - FRAC as i64
    }
}

impl<R: Raw, const FRAC: u32> Add for Fixed<R, FRAC> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_wide(self.bits.widen() + rhs.bits.widen())
    }
}

impl<R: Raw, const FRAC: u32> Sub for Fixed<R, FRAC> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_wide(self.bits.widen() - rhs.bits.widen())
    }
}

impl<R: Raw, const FRAC: u32> Mul for Fixed<R, FRAC> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_wide((self.bits.widen() * rhs.bits.widen()) >> FRAC)
    }
}

impl<R: Raw, const FRAC: u32> ToPrimitive for Fixed<R, FRAC> {
    fn to_i64(&self) -> Option<i64> {
        (self.bits.widen() >> FRAC).to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        (self.bits.widen() >> FRAC).to_u64()
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.bits.widen() as f64 / Self::one())
    }
}

impl<R: Raw, const FRAC: u32> FromPrimitive for Fixed<R, FRAC> {
    fn from_i64(n: i64) -> Option<Self> {
        Self::from_f64(n as f64)
    }

    fn from_u64(n: u64) -> Option<Self> {
        Self::from_f64(n as f64)
    }

    fn from_f64(n: f64) -> Option<Self> {
        let scaled = (n * Self::one()).round();
        if !scaled.is_finite()
            || scaled < R::MIN.widen() as f64
            || scaled > R::MAX.widen() as f64
        {
            return None;
        }
        Some(Self::from_wide(scaled as i128))
    }
}

impl<R: Raw, const FRAC: u32> Debug for Fixed<R, FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed<{}, {}>({})", R::BITS, FRAC, self)
    }
}

impl<R: Raw, const FRAC: u32> Display for Fixed<R, FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits.widen() as f64 / Self::one())
    }
}

/// Batch of fixed-point numbers backed by the integer batch of `R`.
#[derive(Copy, Clone, Debug, Default)]
pub struct FixedBatch<R: Raw, const FRAC: u32>(pub R::Batch);

impl<R: Raw, const FRAC: u32> FixedBatch<R, FRAC> {
    /// Applies `op` lane by lane on widened values, saturating the result.
    fn zip_lanes(self, rhs: Self, op: impl Fn(i128, i128) -> i128) -> Self {
        let mut out = self.0;
        let a = lanes::<R::Batch, R>(&self.0);
        let b = lanes::<R::Batch, R>(&rhs.0);
        for ((o, a), b) in lanes_mut::<R::Batch, R>(&mut out).iter_mut().zip(a).zip(b) {
            *o = R::narrow(op(a.widen(), b.widen()));
        }
        Self(out)
    }
}

impl<R: Raw, const FRAC: u32> Add for FixedBatch<R, FRAC> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.zip_lanes(rhs, |a, b| a + b)
    }
}

impl<R: Raw, const FRAC: u32> Sub for FixedBatch<R, FRAC> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.zip_lanes(rhs, |a, b| a - b)
    }
}

impl<R: Raw, const FRAC: u32> Mul for FixedBatch<R, FRAC> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.zip_lanes(rhs, |a, b| (a * b) >> FRAC)
    }
}

impl<R: Raw, const FRAC: u32> Batch for FixedBatch<R, FRAC> {
    type Mask = R::Batch;
    const LANES: usize = <R::Batch as IntBatch>::LANES;

    fn within(self, bound: Self) -> R::Batch {
        let mut mask = R::Batch::default();
        let a = lanes::<R::Batch, R>(&self.0);
        let b = lanes::<R::Batch, R>(&bound.0);
        for ((m, a), b) in lanes_mut::<R::Batch, R>(&mut mask).iter_mut().zip(a).zip(b) {
            if a <= b {
                *m = R::TRUE;
            }
        }
        mask
    }
}

impl<R: Raw, const FRAC: u32> Scalar for Fixed<R, FRAC> {
    type Lane = R;
    type Batch = FixedBatch<R, FRAC>;

    fn set(batch: &mut Self::Batch, index: usize, value: Self) {
        lanes_mut::<R::Batch, R>(&mut batch.0)[index] = value.bits;
    }

    fn splat(value: Self) -> Self::Batch {
        FixedBatch(R::Batch::splat(value.bits))
    }

    fn from_int(value: i32) -> Self {
        Self::from_wide((value as i128) << FRAC)
    }

    fn scaled(self, n: usize) -> Self {
        Self::from_wide(self.bits.widen() * n as i128)
    }

    fn divided(self, n: usize) -> Self {
        match n {
            0 => self,
            n => Self::from_wide(self.bits.widen() / n as i128),
        }
    }

    fn max_magnitude() -> f64 {
        R::MAX.widen() as f64 / Self::one()
    }
}
