//! Aperture filters.
//!
//! An aperture filter A(u) is the squared modulus of the normalised
//! Fourier transform of the entrance pupil, evaluated at the dimensionless
//! spatial frequency u. Radially symmetric pupils implement
//! [`RadialAperture`] and compose with the 1-D weight function; the
//! Cartesian [`ApertureFilter`] surface serves the 2-D and grid variants.

mod angle_averaged;

pub use angle_averaged::AngleAveraged;

use crate::error::{ScintError, ScintResult};
use lib_math::special::{jinc_pi, sinc_pi, zinc_pi};
use std::f64::consts::PI;

/// An aperture filter over Cartesian spatial frequencies.
pub trait ApertureFilter {
    /// A(u_x, u_y).
    fn eval_xy(&self, ux: f64, uy: f64) -> f64;
}

/// A radially symmetric aperture filter.
///
/// Radial kernels also serve the Cartesian surface through the hypot
/// composition A(√(u_x² + u_y²)).
pub trait RadialAperture: ApertureFilter {
    /// A(u).
    fn eval(&self, u: f64) -> f64;
}

/// Point aperture: A ≡ 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct Point;

impl RadialAperture for Point {
    fn eval(&self, _u: f64) -> f64 {
        1.0
    }
}

impl ApertureFilter for Point {
    fn eval_xy(&self, _ux: f64, _uy: f64) -> f64 {
        1.0
    }
}

/// Unobscured circular aperture (Airy pattern).
#[derive(Clone, Copy, Debug, Default)]
pub struct Circular;

impl RadialAperture for Circular {
    fn eval(&self, u: f64) -> f64 {
        jinc_pi(PI * u).powi(2)
    }
}

impl ApertureFilter for Circular {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}

/// Circular aperture with a central obscuration.
#[derive(Clone, Copy, Debug)]
pub struct Annular {
    obscuration: f64,
}

impl Annular {
    /// Construct with relative central obscuration 0 ≤ ε < 1.
    pub fn new(obscuration: f64) -> ScintResult<Self> {
        if !(0.0..1.0).contains(&obscuration) {
            return Err(ScintError::InvalidObscuration(obscuration));
        }
        Ok(Self { obscuration })
    }

    pub fn obscuration(&self) -> f64 {
        self.obscuration
    }
}

/// Normalised annular pupil transform, before squaring.
fn annular_amplitude(obscuration: f64, u: f64) -> f64 {
    let eps2 = obscuration * obscuration;
    let piu = PI * u;

    (jinc_pi(piu) - eps2 * jinc_pi(obscuration * piu)) / (1.0 - eps2)
}

impl RadialAperture for Annular {
    fn eval(&self, u: f64) -> f64 {
        annular_amplitude(self.obscuration, u).powi(2)
    }
}

impl ApertureFilter for Annular {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}

/// Product of two normalised annular kernels at scales u and αu.
///
/// Models the covariance of two concentric MASS rings: the outer ring
/// (obscuration ε₁) evaluated at u and the inner one (ε₂) at αu, with
/// α the ratio of the ring diameters. The unsquared amplitudes are
/// multiplied, so the kernel keeps its sign and degenerates to
/// [`Annular`] when the rings coincide.
#[derive(Clone, Copy, Debug)]
pub struct CrossAnnular {
    ratio: f64,
    outer_obscuration: f64,
    inner_obscuration: f64,
}

impl CrossAnnular {
    pub fn new(ratio: f64, outer_obscuration: f64, inner_obscuration: f64) -> ScintResult<Self> {
        // validate through the single-ring constructor
        Annular::new(outer_obscuration)?;
        Annular::new(inner_obscuration)?;

        Ok(Self {
            ratio,
            outer_obscuration,
            inner_obscuration,
        })
    }
}

impl RadialAperture for CrossAnnular {
    fn eval(&self, u: f64) -> f64 {
        annular_amplitude(self.outer_obscuration, u)
            * annular_amplitude(self.inner_obscuration, self.ratio * u)
    }
}

impl ApertureFilter for CrossAnnular {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}

/// Square aperture; Cartesian only.
#[derive(Clone, Copy, Debug, Default)]
pub struct Square;

impl ApertureFilter for Square {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        (sinc_pi(ux * PI) * sinc_pi(uy * PI)).powi(2)
    }
}

/// Gaussian-apodised aperture: A(u) = exp(−u²).
#[derive(Clone, Copy, Debug, Default)]
pub struct Gauss;

impl RadialAperture for Gauss {
    fn eval(&self, u: f64) -> f64 {
        (-u * u).exp()
    }
}

impl ApertureFilter for Gauss {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        (-ux * ux - uy * uy).exp()
    }
}

/// Circular aperture with Zernike tilt removed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZTilt;

impl RadialAperture for ZTilt {
    fn eval(&self, u: f64) -> f64 {
        zinc_pi(PI * u).powi(2)
    }
}

impl ApertureFilter for ZTilt {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}

/// Differential-image-motion baseline weighting.
///
/// Wraps an aperture filter as A(u)·J₀(2πβu), where β is the ratio of the
/// DIMM baseline to the aperture scale.
#[derive(Clone, Copy, Debug)]
pub struct Dimm<A> {
    inner: A,
    base_ratio: f64,
}

impl<A: RadialAperture> Dimm<A> {
    pub fn new(inner: A, base_ratio: f64) -> Self {
        Self { inner, base_ratio }
    }
}

impl<A: RadialAperture> RadialAperture for Dimm<A> {
    fn eval(&self, u: f64) -> f64 {
        self.inner.eval(u) * libm::j0(2.0 * PI * self.base_ratio * u)
    }
}

impl<A: RadialAperture> ApertureFilter for Dimm<A> {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}
