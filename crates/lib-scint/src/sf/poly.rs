//! Polychromatic spectral filter.
//!
//! The filter is the squared combination of the real and imaginary parts
//! of the Fourier transform of the spectral response. Transforming the
//! response directly would produce a rapidly oscillating spectrum that no
//! spline could follow; shifting the transform origin to a carrier
//! wavelength near the band centre removes the fast phase so both parts
//! become smooth, and the shift theorem restores the phase analytically at
//! evaluation time.
//!
//! The sign convention matters: the real-to-complex forward transform uses
//! e^{-iωt}, and the sin/cos combination in [`Poly::eval`] is written for
//! that convention. Flipping either one silently corrupts every
//! polychromatic result; see the carrier-placement test below.

use super::SpectralFilter;
use crate::error::{ScintError, ScintResult, Stage};
use crate::response::SpectralResponse;
use lib_math::quadrature::{default_tolerance, ExpSinh};
use lib_math::special::sinc_pi;
use lib_math::{Boundary, CubicSpline, UniformGrid};
use num_complex::Complex64;
use realfft::RealFftPlanner;
use std::f64::consts::PI;

/// Polychromatic spectral filter derived from a tabulated response.
#[derive(Clone, Debug)]
pub struct Poly {
    grid: UniformGrid,
    real: CubicSpline,
    imag: CubicSpline,
    carrier: f64,
    equiv_lambda: f64,
}

impl Poly {
    /// Build from a response with the carrier at the effective wavelength.
    ///
    /// `size` is the minimum FFT length; the transform is padded to
    /// `max(size, response length)`.
    pub fn new(response: &SpectralResponse, size: usize) -> ScintResult<Self> {
        Self::with_carrier(response, size, response.effective_lambda())
    }

    /// Build from a response with an explicit carrier wavelength in nm.
    pub fn with_carrier(
        response: &SpectralResponse,
        size: usize,
        carrier: f64,
    ) -> ScintResult<Self> {
        let resp_grid = response.grid();
        assert!(resp_grid.len() >= 2, "response needs at least 2 samples");

        let carrier_idx = resp_grid.to_index(carrier);
        let padded = resp_grid.len().max(size);

        // Response weighted by 1/lambda (the geometric factor of the
        // spatial-frequency integral), zero-padded to the FFT length,
        // periodically tiled, and sliced starting at the carrier index.
        let weighted: Vec<f64> = response
            .data()
            .iter()
            .enumerate()
            .map(|(i, &v)| v / resp_grid.value(i))
            .collect();
        let mut input: Vec<f64> = (0..padded)
            .map(|j| {
                weighted
                    .get((carrier_idx + j) % padded)
                    .copied()
                    .unwrap_or(0.0)
            })
            .collect();

        let r2c = RealFftPlanner::<f64>::new().plan_fft_forward(padded);
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut input, &mut spectrum)
            .map_err(|e| ScintError::Fft(e.to_string()))?;

        // boundary condition at +inf
        if let Some(last) = spectrum.last_mut() {
            *last = Complex64::new(0.0, 0.0);
        }

        let grid = UniformGrid::new(
            0.0,
            1.0 / (resp_grid.delta() * padded as f64),
            spectrum.len(),
        );

        // The boundary asymmetry is deliberate: the clamped real part and
        // the natural imaginary part make imag(d)/d exact on the first
        // interval, which the regularised form depends on.
        let real = CubicSpline::new(
            spectrum.iter().map(|c| c.re).collect(),
            Boundary::FirstOrder {
                left: 0.0,
                right: 0.0,
            },
        );
        let imag = CubicSpline::new(
            spectrum.iter().map(|c| c.im).collect(),
            Boundary::SecondOrder {
                left: 0.0,
                right: 0.0,
            },
        );

        let mut filter = Self {
            grid,
            real,
            imag,
            carrier: resp_grid.value(carrier_idx),
            equiv_lambda: f64::NAN,
        };
        filter.equiv_lambda = filter.eval_equiv_lambda()?;

        Ok(filter)
    }

    /// The frequency grid of the transformed response.
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    /// Carrier wavelength (nm before normalisation, dimensionless after).
    pub fn carrier(&self) -> f64 {
        self.carrier
    }

    /// Equivalent wavelength λ₀: the wavelength of the monochromatic
    /// filter with the same dimensionless scintillation integral.
    pub fn equiv_lambda(&self) -> f64 {
        self.equiv_lambda
    }

    /// Rescale in place to units of the equivalent wavelength.
    ///
    /// Afterwards `equiv_lambda() == 1` and the filter composes directly
    /// with the dimensionless weight-function integrands.
    pub fn normalize(&mut self) -> &mut Self {
        let lambda_0 = self.equiv_lambda;

        self.grid *= lambda_0;
        self.carrier /= lambda_0;
        self.equiv_lambda /= lambda_0;
        self.real *= lambda_0;
        self.imag *= lambda_0;

        self
    }

    fn eval_equiv_lambda(&self) -> ScintResult<f64> {
        let integrator = ExpSinh::new();

        let i = integrator
            .integrate(
                |x| {
                    if x == 0.0 || x.is_infinite() {
                        return 0.0;
                    }

                    if x < 1.0 {
                        x.powf(1.0 / 6.0) * self.regular(x)
                    } else {
                        x.powf(-11.0 / 6.0) * self.eval(x)
                    }
                },
                default_tolerance(),
            )
            .map_err(|source| ScintError::Quadrature {
                stage: Stage::EquivalentLambda,
                source,
            })?;

        Ok(3.28 * i.powf(-6.0 / 7.0))
    }
}

impl SpectralFilter for Poly {
    fn eval(&self, x: f64) -> f64 {
        let ax = x.abs();

        if self.grid.last() <= ax {
            return 0.0;
        }

        let c = PI * self.carrier;
        let cx = ax * c;
        // the factor 1/2 maps the filter frequency onto the tiled
        // response-transform axis
        let dx = (ax / 2.0 - self.grid.origin()) / self.grid.delta();

        (cx.sin() * self.real.eval(dx) - cx.cos() * self.imag.eval(dx)).powi(2)
    }

    fn regular(&self, x: f64) -> f64 {
        let ax = x.abs();

        if self.grid.last() <= ax {
            return 0.0;
        }

        let c = PI * self.carrier;
        let cx = ax * c;
        let dx = (ax / 2.0 - self.grid.origin()) / self.grid.delta();

        // On the first interval the natural-boundary imaginary spline is
        // dx * (y1 + m1 (dx^2 - 1)/6), so imag(dx)/|x| has the closed form
        // below and the small-x cancellation never happens.
        let im = if dx < 1.0 {
            (self.imag.values()[1] + self.imag.second_derivatives()[1] * (dx * dx - 1.0) / 6.0)
                / (2.0 * self.grid.delta())
        } else {
            self.imag.eval(dx) / ax
        };

        (c * sinc_pi(cx) * self.real.eval(dx) - cx.cos() * im).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sf::Mono;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// A single-line response at 550 nm on a 100-point nm grid.
    fn line_response() -> SpectralResponse {
        let grid = UniformGrid::new(500.0, 1.0, 100);
        let mut data = vec![0.0; 100];
        data[50] = 1.0;
        let mut response = SpectralResponse::new(grid, data).unwrap();
        response.normalize();
        response
    }

    /// A smooth band response centred on 550 nm.
    fn band_response() -> SpectralResponse {
        let grid = UniformGrid::new(450.0, 1.0, 200);
        let data: Vec<f64> = grid
            .values()
            .map(|l| (-0.5 * ((l - 550.0) / 40.0_f64).powi(2)).exp())
            .collect();
        let mut response = SpectralResponse::new(grid, data).unwrap();
        response.normalize();
        response
    }

    #[test]
    fn test_line_equiv_lambda() {
        // a single spectral line behaves as a monochromatic filter at its
        // wavelength
        let sf = Poly::new(&line_response(), 256).unwrap();
        assert_relative_eq!(sf.equiv_lambda(), 550.0, max_relative = 3e-3);
        assert_eq!(sf.carrier(), 550.0);
    }

    #[test]
    fn test_line_matches_mono_after_normalize() {
        let mut sf = Poly::new(&line_response(), 256).unwrap();
        sf.normalize();

        for x in [0.1, 0.25, 0.5, 0.75, 1.3, 2.8] {
            assert_relative_eq!(sf.eval(x), Mono.eval(x), max_relative = 5e-3, epsilon = 1e-6);
            assert_relative_eq!(
                sf.regular(x),
                Mono.regular(x),
                max_relative = 5e-3,
                epsilon = 1e-6
            );
        }
        assert_relative_eq!(sf.regular(0.0), Mono.regular(0.0), max_relative = 5e-3);
    }

    #[test]
    fn test_carrier_shift_theorem() {
        // moving the carrier away from the line must not move the filter:
        // the analytic phase restoration compensates the FFT shift exactly
        // when the transform sign convention is right
        let response = line_response();
        let mut at_line = Poly::with_carrier(&response, 256, 550.0).unwrap();
        let mut offset = Poly::with_carrier(&response, 256, 540.0).unwrap();
        at_line.normalize();
        offset.normalize();

        for x in [0.1, 0.3, 0.5, 0.8, 1.5] {
            assert_relative_eq!(
                offset.eval(x),
                at_line.eval(x),
                max_relative = 5e-3,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_normalize_invariants() {
        let mut sf = Poly::new(&band_response(), 4096).unwrap();
        let lambda_0 = sf.equiv_lambda();
        assert!(lambda_0.is_finite() && lambda_0 > 0.0);

        sf.normalize();
        assert_eq!(sf.equiv_lambda(), 1.0);
        assert!(sf.carrier() > 0.0 && sf.carrier().is_finite());
        assert!(sf.grid().delta() > 0.0 && sf.grid().delta().is_finite());
    }

    #[test]
    fn test_band_equiv_lambda_near_effective() {
        let response = band_response();
        let sf = Poly::new(&response, 4096).unwrap();
        // equivalent and effective wavelengths agree to a few percent for
        // a moderately narrow band
        assert_relative_eq!(
            sf.equiv_lambda(),
            response.effective_lambda(),
            max_relative = 0.05
        );
    }

    #[test]
    fn test_out_of_grid_frequency_is_zero() {
        let sf = Poly::new(&band_response(), 4096).unwrap();
        let beyond = sf.grid().last() + 1.0;
        assert_eq!(sf.eval(beyond), 0.0);
        assert_eq!(sf.regular(beyond), 0.0);
    }

    #[test]
    fn test_eval_even() {
        let sf = Poly::new(&band_response(), 4096).unwrap();
        assert_abs_diff_eq!(sf.eval(0.3), sf.eval(-0.3), epsilon = 1e-15);
    }
}
