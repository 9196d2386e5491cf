use num::{FromPrimitive, ToPrimitive};

use crate::complex::{c, C};
use crate::error::{Error, GeometryError, Result};
use crate::scalar::Scalar;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn num_points(&self) -> usize {
        self.width * self.height
    }
}

/// A sampled parallelogram of the complex plane.
///
/// Point `(row, col)` sits at `origin + col * x_extent / width + row *
/// y_extent / height`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry<S> {
    pub origin: C<S>,
    pub x_extent: C<S>,
    pub y_extent: C<S>,
    pub resolution: Resolution,
}

fn to_f64<S: Scalar>(z: &C<S>) -> C<f64> {
    c(
        z.re.to_f64().unwrap_or(f64::NAN),
        z.im.to_f64().unwrap_or(f64::NAN),
    )
}

impl<S: Scalar> Geometry<S> {
    pub fn new(origin: C<S>, x_extent: C<S>, y_extent: C<S>, resolution: Resolution) -> Self {
        Self {
            origin,
            x_extent,
            y_extent,
            resolution,
        }
    }

    /// Checks the resolution and extents, and that every corner of the
    /// sampled area fits the representation.
    pub fn validate(&self) -> Result<()> {
        let Resolution { width, height } = self.resolution;
        if width == 0 || height == 0 {
            return Err(GeometryError::EmptyResolution { width, height }.into());
        }

        let origin = to_f64(&self.origin);
        let x = to_f64(&self.x_extent);
        let y = to_f64(&self.y_extent);
        if x.re == 0.0 && x.im == 0.0 {
            return Err(GeometryError::DegenerateX.into());
        }
        if y.re == 0.0 && y.im == 0.0 {
            return Err(GeometryError::DegenerateY.into());
        }

        let max = S::max_magnitude();
        for corner in [origin, origin + x, origin + y, origin + x + y] {
            for value in [corner.re, corner.im] {
                if !(value.abs() <= max) {
                    return Err(Error::OutOfRange { value });
                }
            }
        }
        Ok(())
    }

    /// Distance between neighbouring points along a row and along a column.
    pub fn steps(&self) -> (C<S>, C<S>) {
        let Resolution { width, height } = self.resolution;
        let dx = c(self.x_extent.re.divided(width), self.x_extent.im.divided(width));
        let dy = c(self.y_extent.re.divided(height), self.y_extent.im.divided(height));
        (dx, dy)
    }

    /// Coordinate of a point, using precomputed `steps()`.
    pub fn point(&self, steps: &(C<S>, C<S>), row: usize, col: usize) -> C<S> {
        let (dx, dy) = steps;
        c(
            self.origin.re + dx.re.scaled(col) + dy.re.scaled(row),
            self.origin.im + dx.im.scaled(col) + dy.im.scaled(row),
        )
    }
}

impl Geometry<f64> {
    /// The square `[-2, 2] x [-2, 2]`.
    pub fn initial(resolution: Resolution) -> Self {
        Self::new(c(-2.0, -2.0), c(4.0, 0.0), c(0.0, 4.0), resolution)
    }

    /// The same geometry in another representation.
    pub fn convert<S: Scalar>(&self) -> Result<Geometry<S>> {
        let component = |value: f64| S::from_f64(value).ok_or(Error::OutOfRange { value });
        let complex = |z: &C<f64>| -> Result<C<S>> { Ok(c(component(z.re)?, component(z.im)?)) };
        Ok(Geometry {
            origin: complex(&self.origin)?,
            x_extent: complex(&self.x_extent)?,
            y_extent: complex(&self.y_extent)?,
            resolution: self.resolution,
        })
    }
}
