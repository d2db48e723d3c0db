//! In-place DCT-I over both axes of a 2-D tensor.
//!
//! The grid weight function and the digital filter need the self-inverse
//! cosine transform (FFTW's REDFT00). It is realised through the identity
//! DCT-I(v) = Re DFT(even-extension(v)): a row of n samples extends to a
//! symmetric sequence of 2(n−1) samples whose real-to-complex transform
//! carries the cosine series in its real parts. Plans for both axis
//! lengths are built once and reused across calls.

use crate::error::{ScintError, ScintResult};
use ndarray::Array2;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Reusable DCT-I plan for a fixed 2-D shape.
pub(crate) struct DctPlan2d {
    shape: (usize, usize),
    row: Arc<dyn RealToComplex<f64>>,
    col: Arc<dyn RealToComplex<f64>>,
}

impl std::fmt::Debug for DctPlan2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DctPlan2d").field("shape", &self.shape).finish()
    }
}

impl DctPlan2d {
    /// Plan for `(rows, cols)` tensors; both extents must be at least 2.
    pub(crate) fn new(shape: (usize, usize)) -> Self {
        assert!(
            shape.0 >= 2 && shape.1 >= 2,
            "DCT-I needs at least 2 samples per axis"
        );

        let mut planner = RealFftPlanner::<f64>::new();
        let col = planner.plan_fft_forward(2 * (shape.0 - 1));
        let row = planner.plan_fft_forward(2 * (shape.1 - 1));

        Self { shape, row, col }
    }

    pub(crate) fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Apply the unnormalised DCT-I along both axes, in place.
    pub(crate) fn process(&self, data: &mut Array2<f64>) -> ScintResult<()> {
        assert_eq!(data.dim(), self.shape, "tensor shape does not match plan");

        let (rows, cols) = self.shape;
        let mut line = vec![0.0; rows.max(cols)];

        for mut row in data.rows_mut() {
            let line = &mut line[..cols];
            line.copy_from_slice(row.as_slice().expect("row-major layout"));
            dct_1d(&*self.row, line)?;
            row.as_slice_mut()
                .expect("row-major layout")
                .copy_from_slice(line);
        }

        for mut col in data.columns_mut() {
            let line = &mut line[..rows];
            for (dst, &src) in line.iter_mut().zip(col.iter()) {
                *dst = src;
            }
            dct_1d(&*self.col, line)?;
            for (dst, &src) in col.iter_mut().zip(line.iter()) {
                *dst = src;
            }
        }

        Ok(())
    }
}

/// Unnormalised DCT-I of `line` through the planned r2c transform.
fn dct_1d(plan: &dyn RealToComplex<f64>, line: &mut [f64]) -> ScintResult<()> {
    let n = line.len();
    let extended = 2 * (n - 1);

    let mut input = vec![0.0; extended];
    input[..n].copy_from_slice(line);
    for j in 1..n - 1 {
        input[extended - j] = line[j];
    }

    let mut spectrum = plan.make_output_vec();
    plan.process(&mut input, &mut spectrum)
        .map_err(|e| ScintError::Fft(e.to_string()))?;

    for (dst, bin) in line.iter_mut().zip(spectrum.iter()) {
        *dst = bin.re;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array2;
    use std::f64::consts::PI;

    /// Direct REDFT00 definition for one axis.
    fn dct_reference(v: &[f64], k: usize) -> f64 {
        let n = v.len();
        let mut sum = v[0] + if k % 2 == 0 { v[n - 1] } else { -v[n - 1] };
        for (j, &x) in v.iter().enumerate().take(n - 1).skip(1) {
            sum += 2.0 * x * (PI * (j * k) as f64 / (n - 1) as f64).cos();
        }
        sum
    }

    #[test]
    fn test_matches_direct_definition_1d() {
        let v = [1.0, 0.5, -0.25, 2.0, 0.75];
        let plan = DctPlan2d::new((2, v.len()));

        let mut line = v;
        dct_1d(&*plan.row, &mut line).unwrap();
        for (k, &actual) in line.iter().enumerate() {
            assert_abs_diff_eq!(actual, dct_reference(&v, k), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_self_inverse() {
        // REDFT00 applied twice scales by 4(n-1) per axis
        let (rows, cols) = (4, 5);
        let original = Array2::from_shape_fn((rows, cols), |(i, j)| {
            ((i * 7 + j * 3) as f64 * 0.37).sin()
        });

        let plan = DctPlan2d::new((rows, cols));
        let mut data = original.clone();
        plan.process(&mut data).unwrap();
        plan.process(&mut data).unwrap();

        let norm = (4 * (rows - 1) * (cols - 1)) as f64;
        for (a, b) in data.iter().zip(original.iter()) {
            assert_abs_diff_eq!(a / norm, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_input() {
        // DC input concentrates in the corner bin, 4(n-1)(m-1)
        let plan = DctPlan2d::new((3, 3));
        let mut data = Array2::from_elem((3, 3), 1.0);
        plan.process(&mut data).unwrap();

        assert_abs_diff_eq!(data[(0, 0)], 16.0, epsilon = 1e-12);
        for ((i, j), &v) in data.indexed_iter() {
            if (i, j) != (0, 0) {
                assert_abs_diff_eq!(v, 0.0, epsilon = 1e-12);
            }
        }
    }
}
