//! Error types for the scintillation pipeline.

use lib_math::MathError;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage in which a quadrature failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Equivalent-wavelength functional of a polychromatic filter.
    EquivalentLambda,
    /// Weight-function precomputation.
    WeightFunction,
    /// Angular average of an aperture filter.
    AngleAverage,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::EquivalentLambda => "equivalent-wavelength evaluation",
            Stage::WeightFunction => "weight-function precomputation",
            Stage::AngleAverage => "aperture angle averaging",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while building or evaluating weight functions.
#[derive(Debug, Error)]
pub enum ScintError {
    /// Grid validation or combination failure.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Adaptive quadrature failed to converge.
    #[error("quadrature failed during {stage}")]
    Quadrature {
        stage: Stage,
        #[source]
        source: MathError,
    },

    /// A response file could not be read.
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A response file line could not be parsed.
    #[error("malformed response file {path:?} at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Response values do not match the wavelength grid.
    #[error("response length {data} does not match grid length {grid}")]
    LengthMismatch { grid: usize, data: usize },

    /// No response files were supplied.
    #[error("at least one spectral response file is required")]
    NoResponseFiles,

    /// Central obscuration outside [0, 1).
    #[error("central obscuration must lie in [0, 1), got {0}")]
    InvalidObscuration(f64),

    /// Real FFT execution failure.
    #[error("FFT execution failed: {0}")]
    Fft(String),
}

/// Result type for the scintillation pipeline.
pub type ScintResult<T> = Result<T, ScintError>;
