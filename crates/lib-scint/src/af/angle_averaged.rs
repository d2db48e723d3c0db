//! Angle-averaged aperture filter.

use super::{ApertureFilter, RadialAperture};
use crate::error::{ScintError, ScintResult, Stage};
use lib_math::quadrature::{default_tolerance, TanhSinh};
use lib_math::{Boundary, CubicSpline, UniformGrid};
use std::f64::consts::PI;

/// Azimuthal average of a non-axisymmetric aperture filter.
///
/// ⟨A⟩(u) is precomputed at construction on the compact coordinate
/// z = 1/(1+u) ∈ [0, 1] by tanh-sinh integration over the half circle,
/// then stored as a clamped cubic spline; evaluation is a spline lookup.
/// The averaged kernel is radially symmetric by construction, so it
/// composes with the 1-D weight function.
#[derive(Clone, Debug)]
pub struct AngleAveraged {
    grid: UniformGrid,
    af: CubicSpline,
}

impl AngleAveraged {
    /// Average `aperture_filter` over the azimuth on `size` nodes.
    pub fn new(aperture_filter: &impl ApertureFilter, size: usize) -> ScintResult<Self> {
        assert!(size >= 2, "need at least 2 precompute nodes");

        let integrator = TanhSinh::new();
        let tolerance = default_tolerance();
        let mut values = Vec::with_capacity(size);

        for k in 0..size {
            let z = k as f64 / (size - 1) as f64;
            if z == 0.0 {
                values.push(0.0);
                continue;
            }

            let u = (1.0 - z) / z;
            let average = integrator
                .integrate(
                    |t| {
                        let f = PI * (t + 1.0);
                        aperture_filter.eval_xy(u * f.cos(), u * f.sin())
                    },
                    tolerance,
                )
                .map_err(|source| ScintError::Quadrature {
                    stage: Stage::AngleAverage,
                    source,
                })?;

            values.push(average / 2.0);
        }

        Ok(Self {
            grid: UniformGrid::new(0.0, 1.0 / (size - 1) as f64, size),
            af: CubicSpline::new(
                values,
                Boundary::FirstOrder {
                    left: 0.0,
                    right: 0.0,
                },
            ),
        })
    }
}

impl RadialAperture for AngleAveraged {
    fn eval(&self, u: f64) -> f64 {
        let z = (1.0 / (1.0 + u) - self.grid.origin()) / self.grid.delta();
        self.af.eval(z)
    }
}

impl ApertureFilter for AngleAveraged {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}
