//! Monochromatic spectral filter.

use super::SpectralFilter;
use lib_math::special::sinc_pi;
use std::f64::consts::PI;

/// Spectral filter of a monochromatic source: E(x) = sin²(πx).
#[derive(Clone, Copy, Debug, Default)]
pub struct Mono;

impl SpectralFilter for Mono {
    fn eval(&self, x: f64) -> f64 {
        (PI * x).sin().powi(2)
    }

    fn regular(&self, x: f64) -> f64 {
        (PI * sinc_pi(PI * x)).powi(2)
    }
}
