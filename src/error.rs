//! Setup errors. Generation itself cannot fail once these checks pass.

use thiserror::Error;

use crate::threads::PoolError;

/// The lane count of a batch cannot be tiled into a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("batch has no lanes")]
    Empty,

    #[error("lane count {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("block {width}x{height} does not fit snugly into {lanes} lanes")]
    Misfit {
        lanes: usize,
        width: usize,
        height: usize,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("resolution {width}x{height} has an empty axis")]
    EmptyResolution { width: usize, height: usize },

    #[error("x extent is a zero vector")]
    DegenerateX,

    #[error("y extent is a zero vector")]
    DegenerateY,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("representation tops out at {max}, escape test needs at least {required}")]
    Range { max: f64, required: f64 },

    #[error("coordinate {value} cannot be represented")]
    OutOfRange { value: f64 },

    #[error("iteration limit {0} must be between 1 and {}", crate::MAX_ITERATIONS)]
    Limit(u32),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

pub type Result<T> = std::result::Result<T, Error>;
