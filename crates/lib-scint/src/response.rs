//! Tabulated spectral response curves.
//!
//! A spectral response S(λ) is the dimensionless efficiency of an
//! instrument per wavelength, tabulated on a uniform wavelength grid in
//! nanometres. Responses load from two-column whitespace-separated text
//! files, stack multiplicatively (detector times filter times atmosphere),
//! and normalise to unit total response before feeding the polychromatic
//! spectral filter.

use crate::error::{ScintError, ScintResult};
use lib_math::UniformGrid;
use std::path::Path;

/// A spectral response curve on a uniform wavelength grid.
#[derive(Clone, Debug)]
pub struct SpectralResponse {
    grid: UniformGrid,
    data: Vec<f64>,
}

impl SpectralResponse {
    /// Construct from a wavelength grid and matching response values.
    pub fn new(grid: UniformGrid, data: Vec<f64>) -> ScintResult<Self> {
        if grid.len() != data.len() {
            return Err(ScintError::LengthMismatch {
                grid: grid.len(),
                data: data.len(),
            });
        }
        Ok(Self { grid, data })
    }

    /// The wavelength grid in nanometres.
    #[inline]
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    /// The response values.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Normalise in place so the total response is 1.
    pub fn normalize(&mut self) -> &mut Self {
        let norm: f64 = self.data.iter().sum();
        for v in &mut self.data {
            *v /= norm;
        }
        self
    }

    /// Stack another response onto this one (pointwise product).
    ///
    /// The grids are intersected; both value arrays are sliced to the
    /// common range and multiplied elementwise, and this response adopts
    /// the intersected grid. Fails with
    /// [`MathError::MismatchedGrids`](lib_math::MathError::MismatchedGrids)
    /// when the grids disagree in spacing or phase.
    pub fn stack(&mut self, other: &SpectralResponse) -> ScintResult<()> {
        let common = self.grid.intersect(&other.grid)?;
        let idx = self.grid.to_index(common.origin());
        let other_idx = other.grid.to_index(common.origin());

        self.data = (0..common.len())
            .map(|i| self.data[idx + i] * other.data[other_idx + i])
            .collect();
        self.grid = common;

        Ok(())
    }

    /// Effective wavelength: the mean of λ weighted by S(λ)/λ.
    pub fn effective_lambda(&self) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (i, &v) in self.data.iter().enumerate() {
            let w = v / self.grid.value(i);
            weighted += i as f64 * w;
            total += w;
        }
        self.grid.origin() + self.grid.delta() * weighted / total
    }

    /// Load a response from a two-column whitespace-separated file.
    ///
    /// The first column holds wavelengths in nanometres in increasing,
    /// uniformly spaced order; the second the response values. Blank lines
    /// are skipped; there is no header.
    pub fn from_file(path: impl AsRef<Path>) -> ScintResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ScintError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut lambdas = Vec::new();
        let mut values = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let mut columns = line.split_whitespace();
            let parse = |field: Option<&str>| -> Result<f64, String> {
                field
                    .ok_or_else(|| "expected two columns".to_string())?
                    .parse::<f64>()
                    .map_err(|e| e.to_string())
            };

            let lambda = parse(columns.next()).map_err(|reason| ScintError::Parse {
                path: path.to_path_buf(),
                line: line_no + 1,
                reason,
            })?;
            let value = parse(columns.next()).map_err(|reason| ScintError::Parse {
                path: path.to_path_buf(),
                line: line_no + 1,
                reason,
            })?;

            lambdas.push(lambda);
            values.push(value);
        }

        Self::new(UniformGrid::from_values(&lambdas)?, values)
    }

    /// Load and stack several response files.
    ///
    /// Each newly loaded response stacks the running product into itself,
    /// so the grid of the latest file is the starting point for the
    /// intersection. The summed response is independent of this order; the
    /// resulting grid range is not, when ranges nest asymmetrically.
    pub fn stack_from_files<P: AsRef<Path>>(paths: &[P]) -> ScintResult<Self> {
        let mut acc: Option<SpectralResponse> = None;

        for path in paths {
            let mut current = Self::from_file(path)?;
            if let Some(previous) = acc.take() {
                current.stack(&previous)?;
            }
            acc = Some(current);
        }

        acc.ok_or(ScintError::NoResponseFiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn flat(origin: f64, delta: f64, len: usize, value: f64) -> SpectralResponse {
        SpectralResponse::new(UniformGrid::new(origin, delta, len), vec![value; len]).unwrap()
    }

    #[test]
    fn test_normalize() {
        let mut r = flat(400.0, 10.0, 5, 2.0);
        r.normalize();
        let total: f64 = r.data().iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_stack_intersects() {
        let mut a = SpectralResponse::new(
            UniformGrid::new(400.0, 10.0, 4),
            vec![1.0, 2.0, 3.0, 4.0],
        )
        .unwrap();
        let b = SpectralResponse::new(
            UniformGrid::new(410.0, 10.0, 4),
            vec![10.0, 20.0, 30.0, 40.0],
        )
        .unwrap();

        a.stack(&b).unwrap();

        assert_eq!(a.grid().origin(), 410.0);
        assert_eq!(a.grid().len(), 3);
        assert_eq!(a.data(), &[20.0, 60.0, 120.0]);
    }

    #[test]
    fn test_stack_mismatched() {
        let mut a = flat(400.0, 10.0, 4, 1.0);
        let b = flat(405.0, 10.0, 4, 1.0);
        assert!(a.stack(&b).is_err());
    }

    #[test]
    fn test_effective_lambda_flat() {
        // for S/lambda weights over a flat response the mean lands slightly
        // below the grid centre
        let r = flat(500.0, 10.0, 3, 1.0);
        let w: Vec<f64> = vec![1.0 / 500.0, 1.0 / 510.0, 1.0 / 520.0];
        let expected =
            500.0 + 10.0 * (w[1] + 2.0 * w[2]) / (w[0] + w[1] + w[2]);
        assert_relative_eq!(r.effective_lambda(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_effective_lambda_line() {
        // a single nonzero bin pins the effective wavelength to it
        let r = SpectralResponse::new(
            UniformGrid::new(500.0, 10.0, 5),
            vec![0.0, 0.0, 1.0, 0.0, 0.0],
        )
        .unwrap();
        assert_abs_diff_eq!(r.effective_lambda(), 520.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_file() {
        let dir = std::env::temp_dir().join("lib-scint-response-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("response.dat");
        std::fs::write(&path, "400.0 0.15\n410.0  0.25\n\n420.0 0.05\n").unwrap();

        let r = SpectralResponse::from_file(&path).unwrap();
        assert_eq!(r.grid().origin(), 400.0);
        assert_eq!(r.grid().delta(), 10.0);
        assert_eq!(r.data(), &[0.15, 0.25, 0.05]);
    }

    #[test]
    fn test_from_file_non_uniform() {
        let dir = std::env::temp_dir().join("lib-scint-response-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.dat");
        std::fs::write(&path, "400.0 0.1\n410.0 0.2\n425.0 0.3\n").unwrap();

        let result = SpectralResponse::from_file(&path);
        assert!(matches!(
            result,
            Err(ScintError::Math(
                lib_math::MathError::NonUniformGrid { position: 2, .. }
            ))
        ));
    }

    #[test]
    fn test_stack_from_files_adopts_latest_grid() {
        let dir = std::env::temp_dir().join("lib-scint-response-test");
        std::fs::create_dir_all(&dir).unwrap();
        let wide = dir.join("wide.dat");
        let narrow = dir.join("narrow.dat");
        std::fs::write(&wide, "400 1.0\n410 1.0\n420 1.0\n430 1.0\n").unwrap();
        std::fs::write(&narrow, "410 0.5\n420 0.5\n").unwrap();

        // the later file is the base of the fold
        let stacked = SpectralResponse::stack_from_files(&[&wide, &narrow]).unwrap();
        assert_eq!(stacked.grid().origin(), 410.0);
        assert_eq!(stacked.grid().len(), 2);
        assert_eq!(stacked.data(), &[0.5, 0.5]);
    }

    #[test]
    fn test_stack_from_files_empty() {
        let paths: [&str; 0] = [];
        assert!(matches!(
            SpectralResponse::stack_from_files(&paths),
            Err(ScintError::NoResponseFiles)
        ));
    }
}
