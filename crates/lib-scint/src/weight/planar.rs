//! Weight function for arbitrary (non-axisymmetric) aperture filters.

use super::WeightTable;
use crate::af::ApertureFilter;
use crate::error::{ScintError, ScintResult, Stage};
use crate::sf::SpectralFilter;
use lib_math::quadrature::{default_tolerance, ExpSinh, TanhSinh};
use lib_math::MathError;
use std::cell::Cell;
use std::f64::consts::PI;

/// Scintillation weight function with nested radial-angular integration.
///
/// The 2-D spectrum integral splits into an outer exp-sinh over the radial
/// frequency and an inner tanh-sinh over the azimuth fraction φ ∈ (−1, 1).
/// Near the azimuth endpoints cos(πφ) saturates; the angular integrand
/// therefore switches to the signed endpoint distance θ supplied by the
/// integrator, computing the direction from whichever of φ, θ is further
/// from its axis.
#[derive(Clone, Debug)]
pub struct WeightFunction2d {
    table: WeightTable,
}

/// Azimuthal frequency beyond which the angular lattice cannot track the
/// pupil oscillation. The mean of a unit-bounded kernel is zero to
/// working precision there, and the u^(-8/3) damping of the radial factor
/// has long taken over, so the angular integration is skipped.
const ANGULAR_FREQUENCY_CUTOFF: f64 = 3.0e3;

impl WeightFunction2d {
    /// Precompute the weight function on `size` nodes.
    pub fn new(
        spectral_filter: &impl SpectralFilter,
        lambda: f64,
        aperture_filter: &impl ApertureFilter,
        aperture_scale: f64,
        size: usize,
    ) -> ScintResult<Self> {
        assert!(size >= 2, "need at least 2 precompute nodes");

        let radial = ExpSinh::new();
        let angular = TanhSinh::new();
        let tolerance = default_tolerance();
        let mut values = Vec::with_capacity(size);

        // the inner integrator cannot propagate its failure through the
        // outer integrand, so the first one is parked here
        let inner_failure: Cell<Option<MathError>> = Cell::new(None);

        for k in 0..size {
            let z = k as f64 / (size - 1) as f64;
            if z == 0.0 {
                values.push(0.0);
                continue;
            }

            let x = (1.0 - z) / z;
            let result = radial.integrate(
                |u| {
                    if u == 0.0 || u.is_infinite() {
                        return 0.0;
                    }

                    let xu = x * u;
                    if xu.is_finite() && xu.abs() > ANGULAR_FREQUENCY_CUTOFF {
                        return 0.0;
                    }

                    let average = angular.integrate_with_argument(
                        |phi, theta| angular_integrand(aperture_filter, xu, phi, theta),
                        tolerance,
                    );
                    let average = match average {
                        Ok(v) => v,
                        Err(e) => {
                            inner_failure.set(Some(e));
                            return 0.0;
                        }
                    };

                    if u < 1.0 {
                        return u.powf(4.0 / 3.0)
                            * spectral_filter.regular(u * u)
                            * average;
                    }

                    let t = u.powf(-8.0 / 3.0);
                    if t == 0.0 {
                        return 0.0;
                    }

                    t * spectral_filter.eval(u * u) * average
                },
                tolerance,
            );

            if let Some(source) = inner_failure.take() {
                return Err(ScintError::Quadrature {
                    stage: Stage::WeightFunction,
                    source,
                });
            }

            let value = result.map_err(|source| ScintError::Quadrature {
                stage: Stage::WeightFunction,
                source,
            })?;

            // the tanh-sinh sweep covers the full circle; halving it makes
            // the angular mean
            values.push(value * 0.5);
        }

        Ok(Self {
            table: WeightTable::from_values(lambda, aperture_scale, values),
        })
    }

    /// Wavelength in nm.
    pub fn lambda(&self) -> f64 {
        self.table.lambda()
    }

    /// Aperture scale in mm.
    pub fn aperture_scale(&self) -> f64 {
        self.table.aperture_scale()
    }

    /// Evaluate W at `altitude` km.
    pub fn eval(&self, altitude: f64) -> f64 {
        self.table.eval(altitude)
    }
}

fn angular_integrand(af: &impl ApertureFilter, xu: f64, phi: f64, theta: f64) -> f64 {
    if xu.is_infinite() {
        return af.eval_xy(xu, 0.0);
    }

    // cos(pi phi) loses precision once |phi| saturates towards 1; there
    // the identities cos(pi phi) = -cos(pi theta), sin(pi phi) =
    // sin(pi theta) hold with theta = phi -+ 1 well away from saturation
    let (c, s) = if phi.abs() < 0.5 {
        ((PI * phi).cos(), (PI * phi).sin())
    } else {
        (-(PI * theta).cos(), (PI * theta).sin())
    };

    af.eval_xy(xu * c, xu * s)
}
