//! Uniformly spaced numerical grids.
//!
//! A [`UniformGrid`] represents the sequence
//!
//! ```text
//! x[i] = origin + i * delta,  for i = 0, 1, ..., len-1
//! ```
//!
//! Grids are cheap value objects. Tabulated input data (spectral response
//! curves) is validated against this model on load: the first two samples
//! fix `origin` and `delta`, and every later sample must land on the grid
//! bit-exactly.

use crate::error::{MathError, MathResult};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

/// A uniformly spaced 1-D grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformGrid {
    origin: f64,
    delta: f64,
    len: usize,
}

impl UniformGrid {
    /// Construct from origin, spacing and point count.
    pub fn new(origin: f64, delta: f64, len: usize) -> Self {
        Self { origin, delta, len }
    }

    /// Construct from tabulated values, validating uniformity.
    ///
    /// The first value fixes the origin and the second fixes the spacing.
    /// Every subsequent value must equal `origin + i * delta` exactly;
    /// the first violation is reported as
    /// [`MathError::NonUniformGrid`] with its index.
    pub fn from_values(values: &[f64]) -> MathResult<Self> {
        let mut grid = Self::new(0.0, 1.0, values.len());

        if let Some(&first) = values.first() {
            grid.origin = first;
        }
        if let Some(&second) = values.get(1) {
            grid.delta = second - grid.origin;
        }

        for (i, &v) in values.iter().enumerate().skip(2) {
            let expected = grid.value(i);
            if v != expected {
                return Err(MathError::NonUniformGrid {
                    position: i,
                    actual: v,
                    expected,
                });
            }
        }

        Ok(grid)
    }

    /// The starting value of the grid.
    #[inline]
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// The spacing between grid points.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of points in the grid.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the grid holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value of the grid point at `index`.
    #[inline]
    pub fn value(&self, index: usize) -> f64 {
        self.origin + index as f64 * self.delta
    }

    /// Value of the last grid point.
    ///
    /// Meaningful only for non-empty grids; an empty grid reports its
    /// origin.
    #[inline]
    pub fn last(&self) -> f64 {
        if self.len == 0 {
            self.origin
        } else {
            self.value(self.len - 1)
        }
    }

    /// Iterate over the grid values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.value(i))
    }

    /// Index of the grid point at or below `v`.
    #[inline]
    pub fn to_index(&self, v: f64) -> usize {
        ((v - self.origin) / self.delta) as usize
    }

    /// Check if two grids share spacing and phase, i.e. can be intersected.
    pub fn matches(&self, other: &UniformGrid) -> bool {
        self.delta == other.delta
            && self.origin % self.delta == other.origin % other.delta
    }

    /// Compute the largest common subgrid of two grids.
    ///
    /// The result covers the overlapping range with the shared spacing and
    /// is empty when the ranges are disjoint. Fails with
    /// [`MathError::MismatchedGrids`] when the grids differ in spacing or
    /// phase.
    pub fn intersect(&self, other: &UniformGrid) -> MathResult<UniformGrid> {
        if other.origin < self.origin {
            return other.intersect(self);
        }

        if !self.matches(other) {
            return Err(MathError::MismatchedGrids);
        }

        let len = if self.is_empty() || other.is_empty() || self.last() < other.origin {
            0
        } else {
            ((self.last().min(other.last()) - other.origin) / other.delta) as usize + 1
        };

        Ok(UniformGrid::new(other.origin, other.delta, len))
    }
}

impl Mul<f64> for UniformGrid {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.origin * rhs, self.delta * rhs, self.len)
    }
}

impl Div<f64> for UniformGrid {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.origin / rhs, self.delta / rhs, self.len)
    }
}

impl Add<f64> for UniformGrid {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Self::new(self.origin + rhs, self.delta, self.len)
    }
}

impl Sub<f64> for UniformGrid {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self {
        Self::new(self.origin - rhs, self.delta, self.len)
    }
}

impl MulAssign<f64> for UniformGrid {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl DivAssign<f64> for UniformGrid {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

impl AddAssign<f64> for UniformGrid {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

impl SubAssign<f64> for UniformGrid {
    fn sub_assign(&mut self, rhs: f64) {
        *self = *self - rhs;
    }
}
