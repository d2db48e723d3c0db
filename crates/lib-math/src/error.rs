//! Error types for numerical operations.

use thiserror::Error;

/// Errors that can occur in grid and quadrature operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// Input data expected to form a uniform grid has inconsistent spacing.
    #[error("non-uniform input grid at position {position}: found {actual}, expected {expected}")]
    NonUniformGrid {
        position: usize,
        actual: f64,
        expected: f64,
    },

    /// Two grids cannot be combined due to incompatible spacing or phase.
    #[error("mismatched grids: incompatible spacing or phase")]
    MismatchedGrids,

    /// An adaptive integrator exhausted its refinement budget.
    #[error("quadrature failed to converge: error estimate {error:.3e} exceeds tolerance {tolerance:.3e}")]
    QuadratureNonConvergence { error: f64, tolerance: f64 },
}

/// Result type for numerical operations.
pub type MathResult<T> = Result<T, MathError>;
