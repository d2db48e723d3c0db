//! DCT-based weight grids for regular aperture arrays.

use super::GRID_SCALE;
use crate::af::ApertureFilter;
use crate::dct::DctPlan2d;
use crate::error::ScintResult;
use crate::sf::SpectralFilter;
use ndarray::Array2;

/// Per-altitude weight tensor for a regular 2-D array of identical
/// apertures.
///
/// The Cartesian spectrum kernel is tabulated on the frequency rectangle
/// [0, Nyquist]² for the requested altitude and cosine-transformed in
/// place (DCT-I along both axes); element (i, j) of the result is the
/// scintillation weight for the aperture pair separated by (i, j) grid
/// steps.
pub struct WeightFunctionGrid2d {
    lambda: f64,         // nm
    aperture_scale: f64, // mm
    grid_step: f64,      // mm
    fft_norm: f64,
    plan: DctPlan2d,
    kernel: Box<dyn Fn(f64, f64, f64) -> f64>,
}

impl std::fmt::Debug for WeightFunctionGrid2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightFunctionGrid2d")
            .field("lambda", &self.lambda)
            .field("aperture_scale", &self.aperture_scale)
            .field("grid_step", &self.grid_step)
            .field("shape", &self.plan.shape())
            .finish()
    }
}

impl WeightFunctionGrid2d {
    /// Set up the plan and kernel for a `shape` array with `grid_step` mm
    /// between apertures.
    pub fn new<SF, AF>(
        spectral_filter: SF,
        lambda: f64,
        aperture_filter: AF,
        aperture_scale: f64,
        grid_step: f64,
        shape: (usize, usize),
    ) -> Self
    where
        SF: SpectralFilter + 'static,
        AF: ApertureFilter + 'static,
    {
        let fft_norm =
            1.0 / (4 * (shape.0 - 1) * (shape.1 - 1)) as f64 / (grid_step * grid_step);

        let kernel = Box::new(move |ux: f64, uy: f64, x: f64| {
            cartesian_integrand(&spectral_filter, &aperture_filter, ux, uy, x)
        });

        Self {
            lambda,
            aperture_scale,
            grid_step,
            fft_norm,
            plan: DctPlan2d::new(shape),
            kernel,
        }
    }

    /// Wavelength in nm.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Aperture scale in mm.
    pub fn aperture_scale(&self) -> f64 {
        self.aperture_scale
    }

    /// Array step in mm.
    pub fn grid_step(&self) -> f64 {
        self.grid_step
    }

    /// Array shape.
    pub fn shape(&self) -> (usize, usize) {
        self.plan.shape()
    }

    /// Compute the weight tensor for `altitude` km.
    pub fn eval(&self, altitude: f64) -> ScintResult<Array2<f64>> {
        let (nx, ny) = self.plan.shape();

        if altitude == 0.0 {
            return Ok(Array2::zeros((nx, ny)));
        }

        let fresnel_radius = (self.lambda * altitude).sqrt();
        let nyquist = fresnel_radius / self.grid_step / 2.0;
        let x = self.aperture_scale / fresnel_radius;

        let mut result = Array2::from_shape_fn((nx, ny), |(i, j)| {
            let ux = nyquist * i as f64 / (nx - 1) as f64;
            let uy = nyquist * j as f64 / (ny - 1) as f64;
            (self.kernel)(ux, uy, x)
        });

        self.plan.process(&mut result)?;

        let scale = GRID_SCALE * self.fft_norm / self.lambda.powf(1.0 / 6.0)
            * altitude.powf(11.0 / 6.0);
        result.mapv_inplace(|v| v * scale);

        Ok(result)
    }
}

fn cartesian_integrand(
    sf: &impl SpectralFilter,
    af: &impl ApertureFilter,
    ux: f64,
    uy: f64,
    x: f64,
) -> f64 {
    if ux == 0.0 && uy == 0.0 {
        return 0.0;
    }
    if ux.is_infinite() || uy.is_infinite() {
        return 0.0;
    }

    let u2 = ux * ux + uy * uy;

    if u2 < 1.0 {
        return u2.powf(1.0 / 6.0) * sf.regular(u2) * af.eval_xy(x * ux, x * uy);
    }

    let t = u2.powf(-11.0 / 6.0);
    if t == 0.0 {
        return 0.0;
    }

    t * sf.eval(u2) * af.eval_xy(x * ux, x * uy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::af::{Circular, Point};
    use crate::sf::Mono;
    use crate::weight::WeightFunction;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_altitude_is_zero_tensor() {
        let grid = WeightFunctionGrid2d::new(Mono, 550.0, Circular, 11.0, 11.0, (9, 9));
        let result = grid.eval(0.0).unwrap();
        assert_eq!(result.dim(), (9, 9));
        assert!(result.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_result_is_finite_and_symmetric() {
        let grid = WeightFunctionGrid2d::new(Mono, 550.0, Circular, 11.0, 11.0, (17, 17));
        let result = grid.eval(2.0).unwrap();

        assert!(result.iter().all(|v| v.is_finite()));
        // a radial aperture makes the kernel symmetric under axis swap
        for i in 0..17 {
            for j in 0..i {
                assert_relative_eq!(
                    result[(i, j)],
                    result[(j, i)],
                    max_relative = 1e-10,
                    epsilon = 1e-10
                );
            }
        }
    }

    #[test]
    fn test_zero_separation_matches_radial() {
        // the (0, 0) element is the single-aperture weight; with a fine
        // frequency grid it approaches the radial quadrature result
        let altitude = 8.0;
        let grid = WeightFunctionGrid2d::new(Mono, 550.0, Point, 10.0, 2.0, (129, 129));
        let tensor = grid.eval(altitude).unwrap();

        let radial = WeightFunction::new(&Mono, 550.0, &Point, 10.0, 129).unwrap();
        assert_relative_eq!(
            tensor[(0, 0)],
            radial.eval(altitude),
            max_relative = 0.05
        );
    }

    #[test]
    fn test_weights_decay_with_separation() {
        let grid = WeightFunctionGrid2d::new(Mono, 550.0, Circular, 11.0, 11.0, (17, 17));
        let result = grid.eval(4.0).unwrap();

        // the co-located weight dominates any distant pair
        let center = result[(0, 0)];
        assert!(center > 0.0);
        assert!(center > result[(16, 16)].abs());
    }
}
