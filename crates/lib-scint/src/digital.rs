//! Digital filters for regular aperture arrays.
//!
//! A 2-D digital filter is defined by its frequency response Ω(u_x, u_y)
//! on the dimensionless Nyquist square [0, ½]²; the impulse response is
//! recovered by an in-place DCT-I and stored as the symmetric tap tensor.
//! Evaluation reconstructs the response at arbitrary frequency by the
//! cosine series over the taps.

use crate::dct::DctPlan2d;
use crate::error::ScintResult;
use ndarray::Array2;
use std::f64::consts::PI;

/// A 2-D digital filter held as its impulse response.
#[derive(Clone, Debug)]
pub struct DigitalFilter2d {
    impulse: Array2<f64>,
}

impl DigitalFilter2d {
    /// Build from a frequency response tabulated over [0, ½]².
    pub fn from_function<F>(response: F, shape: (usize, usize)) -> ScintResult<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        let (nx, ny) = shape;
        let nyquist = 0.5;

        let mut impulse = Array2::from_shape_fn(shape, |(i, j)| {
            let ux = nyquist * i as f64 / (nx - 1) as f64;
            let uy = nyquist * j as f64 / (ny - 1) as f64;
            response(ux, uy)
        });

        let plan = DctPlan2d::new(shape);
        plan.process(&mut impulse)?;

        let fft_norm = 1.0 / (4 * (nx - 1) * (ny - 1)) as f64;
        impulse.mapv_inplace(|v| v * fft_norm);

        Ok(Self { impulse })
    }

    /// Wrap an existing impulse response.
    pub fn from_impulse(impulse: Array2<f64>) -> Self {
        Self { impulse }
    }

    /// The impulse-response taps.
    pub fn impulse(&self) -> &Array2<f64> {
        &self.impulse
    }

    /// Filter dimensions.
    pub fn shape(&self) -> (usize, usize) {
        self.impulse.dim()
    }

    /// Mix the amplitude in place: subtract a checkerboard alternation of
    /// the centre tap, zeroing the (0, 0) response.
    pub fn mix(&mut self) -> &mut Self {
        let (nx, ny) = self.shape();
        let amplitude = self.impulse[(0, 0)];

        for i in 0..nx {
            for j in 0..ny {
                let sign = (i + j) % 2 == 1;
                self.impulse[(i, j)] += if sign { amplitude } else { -amplitude };
            }
        }
        self.impulse[(0, 0)] = 0.0;

        self
    }

    /// Evaluate the filter response at dimensionless frequency
    /// (u_x, u_y).
    ///
    /// The cosine series is accumulated with angle recurrences; edge taps
    /// are weighted once, interior taps twice per axis.
    pub fn eval(&self, ux: f64, uy: f64) -> f64 {
        let (nx, ny) = self.shape();

        let two_pi = 2.0 * PI;
        let cx = (two_pi * ux).cos();
        let sx = (two_pi * ux).sin();
        let cy = (two_pi * uy).cos();
        let sy = (two_pi * uy).sin();

        let mut ret = 0.0;
        let mut six = 0.0;
        let mut cix = 1.0;
        for i in 0..nx {
            let i_norm = if i > 0 { 2.0 } else { 1.0 };
            let mut sjy = 0.0;
            let mut cjy = 1.0;

            for j in 0..ny {
                let j_norm = if j > 0 { 2.0 } else { 1.0 };

                ret += self.impulse[(i, j)] * i_norm * j_norm * (cix * cjy - six * sjy);

                let tmp = cjy * cy - sjy * sy;
                sjy = sjy * cy + cjy * sy;
                cjy = tmp;
            }

            let tmp = cix * cx - six * sx;
            six = six * cx + cix * sx;
            cix = tmp;
        }

        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_all_pass_filter_is_delta_tap() {
        let filter = DigitalFilter2d::from_function(|_, _| 1.0, (9, 9)).unwrap();

        assert_abs_diff_eq!(filter.impulse()[(0, 0)], 1.0, epsilon = 1e-12);
        for ((i, j), &v) in filter.impulse().indexed_iter() {
            if (i, j) != (0, 0) {
                assert_abs_diff_eq!(v, 0.0, epsilon = 1e-12);
            }
        }

        for (ux, uy) in [(0.0, 0.0), (0.13, 0.4), (0.5, 0.25)] {
            assert_abs_diff_eq!(filter.eval(ux, uy), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_single_mode_reconstruction() {
        // a pure cosine response maps onto one tap and reconstructs
        // everywhere
        let filter =
            DigitalFilter2d::from_function(|ux, _| (2.0 * PI * ux).cos(), (9, 9)).unwrap();

        for (ux, uy) in [(0.0, 0.0), (0.1, 0.3), (0.37, 0.02), (0.5, 0.5)] {
            assert_abs_diff_eq!(
                filter.eval(ux, uy),
                (2.0 * PI * ux).cos(),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_mix_zeroes_center() {
        let mut filter =
            DigitalFilter2d::from_function(|ux, uy| 1.0 + 0.2 * (2.0 * PI * (ux + uy)).cos(), (9, 9))
                .unwrap();
        let amplitude = filter.impulse()[(0, 0)];
        assert!(amplitude != 0.0);

        filter.mix();

        assert_eq!(filter.impulse()[(0, 0)], 0.0);
        // a neighbouring tap gained the checkerboard amplitude
        let mixed = filter.impulse()[(0, 1)];
        let unmixed = DigitalFilter2d::from_function(
            |ux, uy| 1.0 + 0.2 * (2.0 * PI * (ux + uy)).cos(),
            (9, 9),
        )
        .unwrap();
        assert_abs_diff_eq!(
            mixed,
            unmixed.impulse()[(0, 1)] + amplitude,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_eval_periodicity() {
        let filter =
            DigitalFilter2d::from_function(|ux, uy| (2.0 * PI * ux).cos() * (2.0 * PI * uy).cos(), (7, 7))
                .unwrap();
        assert_abs_diff_eq!(
            filter.eval(0.2, 0.3),
            filter.eval(1.2, 0.3),
            epsilon = 1e-10
        );
    }
}
