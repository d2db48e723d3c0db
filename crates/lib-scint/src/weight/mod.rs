//! Scintillation weight functions.
//!
//! A weight function W(h) maps the altitude of a thin turbulent layer to
//! its contribution to the observed scintillation index:
//!
//! W(h) = 2π·C·h^{5/6}·λ^{−7/6}·w(z),   z = ρ_F/(ρ_F + D),  ρ_F = √(λh),
//!
//! where w is the dimensionless spectrum integral of the composed spectral
//! and aperture filters, precomputed on the compact coordinate z ∈ [0, 1]
//! and spline-interpolated. C folds the Kolmogorov prefactor with the
//! km/nm/mm unit conversions.
//!
//! Variants: [`WeightFunction`] (radial integration, axisymmetric
//! apertures), [`WeightFunction2d`] (nested radial-angular integration,
//! arbitrary apertures), and [`WeightFunctionGrid2d`] (per-altitude DCT
//! over a regular aperture array).

mod grid;
mod planar;
mod radial;

pub use grid::WeightFunctionGrid2d;
pub use planar::WeightFunction2d;
pub use radial::WeightFunction;

use lib_math::special::KOLMOGOROV_CN2_SCALE;
use lib_math::{Boundary, CubicSpline, UniformGrid};
use std::f64::consts::PI;

/// (10³)^{5/6} · (10⁹)^{7/6}: converts km and nm to SI.
const KM_NM_TO_SI: f64 = 1e13;

/// Prefactor of the spline-based weight functions, 2π and the Kolmogorov
/// constant fused: 2π · C · 16π² · 10¹³.
pub(crate) const RADIAL_SCALE: f64 =
    KOLMOGOROV_CN2_SCALE * 32.0 * PI * PI * PI * KM_NM_TO_SI;

/// Prefactor of the Cartesian grid variant: C · 16π² · 10¹³ (the angular
/// factor lives in the 2-D transform itself).
pub(crate) const GRID_SCALE: f64 = KOLMOGOROV_CN2_SCALE * 16.0 * PI * PI * KM_NM_TO_SI;

/// Precomputed dimensionless weight values with their altitude mapping.
#[derive(Clone, Debug)]
pub(crate) struct WeightTable {
    lambda: f64,         // nm
    aperture_scale: f64, // mm
    grid: UniformGrid,
    wf: CubicSpline,
}

impl WeightTable {
    pub(crate) fn from_values(lambda: f64, aperture_scale: f64, values: Vec<f64>) -> Self {
        let size = values.len();

        Self {
            lambda,
            aperture_scale,
            grid: UniformGrid::new(0.0, 1.0 / (size - 1) as f64, size),
            wf: CubicSpline::new(
                values,
                Boundary::FirstOrder {
                    left: 0.0,
                    right: 0.0,
                },
            ),
        }
    }

    pub(crate) fn lambda(&self) -> f64 {
        self.lambda
    }

    pub(crate) fn aperture_scale(&self) -> f64 {
        self.aperture_scale
    }

    /// W(h) for altitude h in km.
    ///
    /// The compact coordinate is computed as z = 1/(1 + D/ρ_F), which is
    /// exact at both ends: h = 0 gives z = 0 (and W = 0 through the
    /// altitude power), h = ∞ gives z = 1 and W = ∞.
    pub(crate) fn eval(&self, altitude: f64) -> f64 {
        let fresnel_radius = (self.lambda * altitude).sqrt();
        let z = 1.0 / (1.0 + self.aperture_scale / fresnel_radius);
        let index = (z - self.grid.origin()) / self.grid.delta();

        RADIAL_SCALE * altitude.powf(5.0 / 6.0) / self.lambda.powf(7.0 / 6.0)
            * self.wf.eval(index)
    }
}
