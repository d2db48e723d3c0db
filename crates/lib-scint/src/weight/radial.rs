//! Weight function for axisymmetric aperture filters.

use super::WeightTable;
use crate::af::RadialAperture;
use crate::error::{ScintError, ScintResult, Stage};
use crate::sf::SpectralFilter;
use lib_math::quadrature::{default_tolerance, ExpSinh};

/// Scintillation weight function with radial spectrum integration.
///
/// For each node of the compact altitude grid the Kolmogorov spectrum is
/// integrated over the radial frequency u on (0, ∞); below u = 1 the
/// regularised filter form u^{4/3}·regular(u²) replaces the singular
/// u^{−8/3}·E(u²) product.
#[derive(Clone, Debug)]
pub struct WeightFunction {
    table: WeightTable,
}

impl WeightFunction {
    /// Precompute the weight function on `size` nodes.
    ///
    /// `lambda` is the (equivalent) wavelength in nm, `aperture_scale` the
    /// aperture diameter in mm.
    pub fn new(
        spectral_filter: &impl SpectralFilter,
        lambda: f64,
        aperture_filter: &impl RadialAperture,
        aperture_scale: f64,
        size: usize,
    ) -> ScintResult<Self> {
        assert!(size >= 2, "need at least 2 precompute nodes");

        let integrator = ExpSinh::new();
        let tolerance = default_tolerance();
        let mut values = Vec::with_capacity(size);

        for k in 0..size {
            let z = k as f64 / (size - 1) as f64;
            if z == 0.0 {
                values.push(0.0);
                continue;
            }

            let x = (1.0 - z) / z;
            let value = integrator
                .integrate(
                    |u| radial_integrand(spectral_filter, aperture_filter, u, x),
                    tolerance,
                )
                .map_err(|source| ScintError::Quadrature {
                    stage: Stage::WeightFunction,
                    source,
                })?;
            values.push(value);
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

fn radial_integrand(
    sf: &impl SpectralFilter,
    af: &impl RadialAperture,
    u: f64,
    x: f64,
) -> f64 {
    if u == 0.0 || u.is_infinite() {
        return 0.0;
    }

    if u < 1.0 {
        return u.powf(4.0 / 3.0) * sf.regular(u * u) * af.eval(x * u);
    }

    let t = u.powf(-8.0 / 3.0);
    if t == 0.0 {
        return 0.0;
    }

    t * sf.eval(u * u) * af.eval(x * u)
}
