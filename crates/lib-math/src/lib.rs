//! # lib-math
//!
//! Numerical foundations for atmospheric scintillation analysis:
//!
//! - **Uniform grids**: equispaced index-to-value mappings with phase-match
//!   and intersection semantics
//! - **Cubic splines**: unit-spaced interpolation with configurable
//!   boundary conditions
//! - **Special functions**: jinc/zinc/sinc kernels and the Kolmogorov
//!   turbulence prefactor
//! - **Quadrature**: adaptive double-exponential integration on
//!   semi-infinite and finite intervals

pub mod error;
pub mod grid;
pub mod quadrature;
pub mod special;
pub mod spline;

pub use error::{MathError, MathResult};
pub use grid::UniformGrid;
pub use quadrature::{ExpSinh, TanhSinh};
pub use spline::{Boundary, CubicSpline};
