use std::fmt::{self, Debug, Display};
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use num::{FromPrimitive, ToPrimitive};
use wide::{f32x8, f64x4};

use crate::batch::{lanes_mut, Batch};
use crate::fixed::{Fixed32, Fixed64};
use crate::layout::BlockLayout;

/// A scalar numeric representation and the batch it is packed into.
///
/// Two families implement this: native floats, where a lane is the scalar
/// itself, and fixed-point numbers, where a lane is the raw integer behind
/// the scalar and the batch is a fixed-point view over an integer batch.
pub trait Scalar:
    Copy
    + Debug
    + PartialOrd
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + FromPrimitive
    + ToPrimitive
    + 'static
{
    /// Element stored in each lane.
    type Lane: Copy + Debug;
    type Batch: Batch;
    const LANES: usize = <Self::Batch as Batch>::LANES;

    /// Stores `value` into lane `index` of `batch`, in place.
    fn set(batch: &mut Self::Batch, index: usize, value: Self);

    fn splat(value: Self) -> Self::Batch;

    /// Exact small integer; saturates if the representation is too narrow.
    fn from_int(value: i32) -> Self;

    /// `self * n`, without first converting `n` into the representation.
    fn scaled(self, n: usize) -> Self;

    /// `self / n`.
    fn divided(self, n: usize) -> Self;

    /// Largest magnitude the representation holds.
    fn max_magnitude() -> f64;
}

macro_rules! impl_native_scalar {
    ($scalar:ty, $batch:ty) => {
        impl Scalar for $scalar {
            type Lane = $scalar;
            type Batch = $batch;

            fn set(batch: &mut $batch, index: usize, value: $scalar) {
                lanes_mut::<$batch, $scalar>(batch)[index] = value;
            }

            fn splat(value: $scalar) -> $batch {
                <$batch>::splat(value)
            }

            fn from_int(value: i32) -> Self {
                value as $scalar
            }

            fn scaled(self, n: usize) -> Self {
                self * n as $scalar
            }

            fn divided(self, n: usize) -> Self {
                self / n as $scalar
            }

            fn max_magnitude() -> f64 {
                <$scalar>::MAX as f64
            }
        }

        const _: () = assert!(
            BlockLayout::for_lanes(<$batch as Batch>::LANES).is_ok(),
            "block does not fit snugly into batch"
        );
    };
}

impl_native_scalar!(f32, f32x8);
impl_native_scalar!(f64, f64x4);

/// Runtime tag naming one of the compiled-in representations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Representation {
    Float,
    Double,
    Fixed64,
    Fixed32,
}

impl Representation {
    pub const ALL: [Representation; 4] = [
        Representation::Float,
        Representation::Double,
        Representation::Fixed64,
        Representation::Fixed32,
    ];

    pub fn lanes(&self) -> usize {
        match self {
            Self::Float => f32::LANES,
            Self::Double => f64::LANES,
            Self::Fixed64 => Fixed64::LANES,
            Self::Fixed32 => Fixed32::LANES,
        }
    }
}

impl Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "f32",
            Self::Double => "f64",
            Self::Fixed64 => "fixed64",
            Self::Fixed32 => "fixed32",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown representation {0:?}, expected one of f32, f64, fixed64, fixed32")]
pub struct UnknownRepresentation(pub String);

impl FromStr for Representation {
    type Err = UnknownRepresentation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "f32" | "float" => Ok(Self::Float),
            "f64" | "double" => Ok(Self::Double),
            "fixed64" | "fixed" => Ok(Self::Fixed64),
            "fixed32" => Ok(Self::Fixed32),
            _ => Err(UnknownRepresentation(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::batch::lanes;

    #[test]
    fn test_set_native_lane() {
        let mut batch = f32::splat(0.0);
        f32::set(&mut batch, 5, 1.5);
        let values = lanes::<f32x8, f32>(&batch);
        assert_eq!(values, &[0.0, 0.0, 0.0, 0.0, 0.0, 1.5, 0.0, 0.0]);
    }

    #[test]
    fn test_lanes() {
        assert_eq!(f32::LANES, 8);
        assert_eq!(f64::LANES, 4);
        assert_eq!(Representation::Fixed64.lanes(), 4);
        assert_eq!(Representation::Fixed32.lanes(), 8);
    }

    #[test]
    fn test_parse_representation() {
        for repr in Representation::ALL {
            assert_eq!(repr.to_string().parse::<Representation>(), Ok(repr));
        }
        assert_eq!("Double".parse::<Representation>(), Ok(Representation::Double));
        assert!("f16".parse::<Representation>().is_err());
    }
}
