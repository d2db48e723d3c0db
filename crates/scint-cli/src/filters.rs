//! Filter composition from command-line flags.
//!
//! The library keeps spectral and aperture filters as separate generic
//! kernels; here the flag combinations are folded into small dispatch
//! enums so one weight-function call serves every composition.

use anyhow::{ensure, Result};
use lib_scint::af::{
    Annular, ApertureFilter, Circular, Point, RadialAperture, Square, ZTilt,
};
use lib_scint::sf::{Mono, Poly, SpectralFilter};
use lib_scint::SpectralResponse;
use std::path::PathBuf;

/// FFT length of the polychromatic filter.
pub const POLY_FFT_SIZE: usize = 4096;

/// Spectral filter selected at the command line.
pub enum AnySpectral {
    Mono(Mono),
    Poly(Poly),
}

impl SpectralFilter for AnySpectral {
    fn eval(&self, x: f64) -> f64 {
        match self {
            AnySpectral::Mono(sf) => sf.eval(x),
            AnySpectral::Poly(sf) => sf.eval(x),
        }
    }

    fn regular(&self, x: f64) -> f64 {
        match self {
            AnySpectral::Mono(sf) => sf.regular(x),
            AnySpectral::Poly(sf) => sf.regular(x),
        }
    }
}

/// Build the spectral filter and its wavelength from the CLI flags.
///
/// With `--mono <lambda>` the monochromatic filter is used directly;
/// otherwise the response files are stacked, normalised and transformed
/// into a polychromatic filter normalised to its equivalent wavelength.
pub fn make_spectral_filter(
    response_filenames: &[PathBuf],
    mono: Option<f64>,
    carrier: Option<f64>,
) -> Result<(f64, AnySpectral)> {
    if let Some(lambda) = mono {
        ensure!(lambda > 0.0, "--mono wavelength must be positive");
        return Ok((lambda, AnySpectral::Mono(Mono)));
    }

    ensure!(
        !response_filenames.is_empty(),
        "at least one --response-filename is required without --mono"
    );

    let mut response = SpectralResponse::stack_from_files(response_filenames)?;
    tracing::info!("effective lambda: {:.4} nm", response.effective_lambda());
    response.normalize();

    let mut filter = match carrier {
        Some(carrier) => Poly::with_carrier(&response, POLY_FFT_SIZE, carrier)?,
        None => Poly::new(&response, POLY_FFT_SIZE)?,
    };

    let lambda = filter.equiv_lambda();
    tracing::info!("equivalent lambda: {:.4} nm", lambda);
    tracing::info!("carrier: {:.4} nm", filter.carrier());
    filter.normalize();

    Ok((lambda, AnySpectral::Poly(filter)))
}

/// Radially symmetric aperture filter selected at the command line.
pub enum AnyRadial {
    Point(Point),
    Circular(Circular),
    Annular(Annular),
    ZTilt(ZTilt),
}

impl RadialAperture for AnyRadial {
    fn eval(&self, u: f64) -> f64 {
        match self {
            AnyRadial::Point(af) => af.eval(u),
            AnyRadial::Circular(af) => af.eval(u),
            AnyRadial::Annular(af) => af.eval(u),
            AnyRadial::ZTilt(af) => af.eval(u),
        }
    }
}

impl ApertureFilter for AnyRadial {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        self.eval(ux.hypot(uy))
    }
}

/// Build the radial aperture kernel from the CLI flags.
///
/// A zero aperture scale selects the point aperture regardless of the
/// other flags.
pub fn make_radial_aperture(
    aperture_scale: f64,
    central_obscuration: f64,
    ztilt: bool,
) -> Result<AnyRadial> {
    if aperture_scale == 0.0 {
        return Ok(AnyRadial::Point(Point));
    }

    if ztilt {
        return Ok(AnyRadial::ZTilt(ZTilt));
    }

    if central_obscuration != 0.0 {
        return Ok(AnyRadial::Annular(Annular::new(central_obscuration)?));
    }

    Ok(AnyRadial::Circular(Circular))
}

/// General aperture filter for the planar and grid modes.
pub enum AnyAperture {
    Radial(AnyRadial),
    Square(Square),
}

impl ApertureFilter for AnyAperture {
    fn eval_xy(&self, ux: f64, uy: f64) -> f64 {
        match self {
            AnyAperture::Radial(af) => af.eval_xy(ux, uy),
            AnyAperture::Square(af) => af.eval_xy(ux, uy),
        }
    }
}

pub fn make_aperture(
    aperture_scale: f64,
    central_obscuration: f64,
    square: bool,
) -> Result<AnyAperture> {
    if square && aperture_scale != 0.0 {
        return Ok(AnyAperture::Square(Square));
    }

    Ok(AnyAperture::Radial(make_radial_aperture(
        aperture_scale,
        central_obscuration,
        false,
    )?))
}
