//! # lib-scint
//!
//! Scintillation weight functions for MASS/DIMM-class atmospheric
//! turbulence profiling.
//!
//! The pipeline: tabulated spectral responses are loaded, stacked and
//! normalised ([`response`]); a spectral filter E(x) is derived from them
//! ([`sf`], monochromatic, Gaussian-band or polychromatic via a
//! carrier-shifted FFT); an aperture filter A(u) describes the pupil
//! ([`af`]); and a weight function W(h) composes the two through
//! double-exponential integration over the Kolmogorov spectrum
//! ([`weight`]), precomputed on a compact altitude coordinate and
//! interpolated by cubic spline.
//!
//! # Units
//!
//! Wavelengths are in nanometres, aperture scales and grid steps in
//! millimetres, altitudes in kilometres. The numeric prefactors of the
//! weight functions absorb the conversion to SI.

pub mod af;
pub(crate) mod dct;
pub mod digital;
pub mod error;
pub mod response;
pub mod sf;
pub mod weight;

pub use error::{ScintError, ScintResult, Stage};
pub use response::SpectralResponse;
