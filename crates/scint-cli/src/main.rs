//! scint: scintillation weight functions for atmospheric turbulence
//! profiling.
//!
//! Computes W(h) tables for MASS/DIMM-class instruments from tabulated
//! spectral response curves and aperture geometry, and writes them as
//! CSV.

mod filters;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lib_scint::af::{CrossAnnular, Dimm};
use lib_scint::weight::{WeightFunction, WeightFunction2d, WeightFunctionGrid2d};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Node count of the precomputed weight-function spline.
const WF_GRID_SIZE: usize = 1025;

#[derive(Parser)]
#[command(name = "scint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every spectral pipeline.
#[derive(Args)]
struct SpectralArgs {
    /// Spectral response input filename (repeatable)
    #[arg(long)]
    response_filename: Vec<PathBuf>,

    /// Use a monochromatic spectral filter at the given wavelength (nm)
    #[arg(long)]
    mono: Option<f64>,

    /// Carrier wavelength in nm (defaults to the effective wavelength)
    #[arg(long)]
    carrier: Option<f64>,
}

/// Flags shared by the altitude-table commands.
#[derive(Args)]
struct TableArgs {
    /// Output grid size
    #[arg(long, default_value = "1024")]
    size: usize,

    /// Largest tabulated altitude, km
    #[arg(long, default_value = "30.0")]
    max_altitude: f64,

    /// Output filename
    #[arg(long, default_value = "wf.dat")]
    output_filename: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Weight function for a radially symmetric aperture
    Radial {
        #[command(flatten)]
        spectral: SpectralArgs,

        #[command(flatten)]
        table: TableArgs,

        /// Aperture scale, mm (0 selects a point aperture)
        #[arg(long, default_value = "20.574")]
        aperture_scale: f64,

        /// Central obscuration, 0 <= eps < 1
        #[arg(long, default_value = "0.0")]
        central_obscuration: f64,

        /// Use the tilt-removed circular aperture
        #[arg(long)]
        ztilt: bool,

        /// DIMM baseline divided by the aperture scale; wraps the kernel
        /// in the J0 baseline weighting
        #[arg(long)]
        base_ratio: Option<f64>,
    },

    /// Weight function for an arbitrary aperture (nested 2-D integration)
    Planar {
        #[command(flatten)]
        spectral: SpectralArgs,

        #[command(flatten)]
        table: TableArgs,

        /// Aperture scale, mm (0 selects a point aperture)
        #[arg(long, default_value = "20.574")]
        aperture_scale: f64,

        /// Central obscuration, 0 <= eps < 1
        #[arg(long, default_value = "0.0")]
        central_obscuration: f64,

        /// Use the square aperture filter
        #[arg(long)]
        square: bool,
    },

    /// Per-aperture weight grid for a regular 2-D array at one altitude
    Grid {
        #[command(flatten)]
        spectral: SpectralArgs,

        /// Aperture scale, mm
        #[arg(long, default_value = "11.0")]
        aperture_scale: f64,

        /// Central obscuration, 0 <= eps < 1
        #[arg(long, default_value = "0.0")]
        central_obscuration: f64,

        /// Array step, mm
        #[arg(long, default_value = "11.0")]
        grid_step: f64,

        /// Array extent per axis
        #[arg(long, default_value = "121")]
        grid_size: usize,

        /// Altitude of the evaluated layer, km
        #[arg(long, default_value = "2.0")]
        altitude: f64,

        /// Output filename
        #[arg(long, default_value = "wf.dat")]
        output_filename: PathBuf,
    },

    /// Weight functions of the four-ring MASS aperture set
    Mass {
        #[command(flatten)]
        spectral: SpectralArgs,

        #[command(flatten)]
        table: TableArgs,

        /// Magnification ratio of the relay optics
        #[arg(long, default_value = "16.20")]
        magnification: f64,
    },

    /// Dump circular and annular aperture filter curves
    Aperture {
        /// Output grid size
        #[arg(long, default_value = "1024")]
        size: usize,

        /// Central obscuration of the annular curve
        #[arg(long, default_value = "0.25")]
        central_obscuration: f64,
    },
}

fn main() -> Result<()> {
    // flag errors print the usage banner and exit with code 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Radial {
            spectral,
            table,
            aperture_scale,
            central_obscuration,
            ztilt,
            base_ratio,
        } => radial(
            spectral,
            table,
            aperture_scale,
            central_obscuration,
            ztilt,
            base_ratio,
        ),
        Commands::Planar {
            spectral,
            table,
            aperture_scale,
            central_obscuration,
            square,
        } => planar(spectral, table, aperture_scale, central_obscuration, square),
        Commands::Grid {
            spectral,
            aperture_scale,
            central_obscuration,
            grid_step,
            grid_size,
            altitude,
            output_filename,
        } => grid(
            spectral,
            aperture_scale,
            central_obscuration,
            grid_step,
            grid_size,
            altitude,
            output_filename,
        ),
        Commands::Mass {
            spectral,
            table,
            magnification,
        } => mass(spectral, table, magnification),
        Commands::Aperture {
            size,
            central_obscuration,
        } => aperture(size, central_obscuration),
    }
}

/// Uniform altitude grid in km.
fn altitude_grid(max_altitude: f64, size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| max_altitude * i as f64 / (size - 1) as f64)
        .collect()
}

fn radial(
    spectral: SpectralArgs,
    table: TableArgs,
    aperture_scale: f64,
    central_obscuration: f64,
    ztilt: bool,
    base_ratio: Option<f64>,
) -> Result<()> {
    let (lambda, sf) = filters::make_spectral_filter(
        &spectral.response_filename,
        spectral.mono,
        spectral.carrier,
    )?;
    let af = filters::make_radial_aperture(aperture_scale, central_obscuration, ztilt)?;

    let started = Instant::now();
    let wf = match base_ratio {
        Some(beta) => WeightFunction::new(
            &sf,
            lambda,
            &Dimm::new(af, beta),
            aperture_scale,
            WF_GRID_SIZE,
        )?,
        None => WeightFunction::new(&sf, lambda, &af, aperture_scale, WF_GRID_SIZE)?,
    };
    tracing::info!("consumed time: {:.3} s", started.elapsed().as_secs_f64());

    let grid = altitude_grid(table.max_altitude, table.size);
    let weights = grid.iter().map(|&h| wf.eval(h)).collect();

    output::write_columns(&table.output_filename, &[grid, weights])
}

fn planar(
    spectral: SpectralArgs,
    table: TableArgs,
    aperture_scale: f64,
    central_obscuration: f64,
    square: bool,
) -> Result<()> {
    let (lambda, sf) = filters::make_spectral_filter(
        &spectral.response_filename,
        spectral.mono,
        spectral.carrier,
    )?;
    let af = filters::make_aperture(aperture_scale, central_obscuration, square)?;

    let started = Instant::now();
    let wf = WeightFunction2d::new(&sf, lambda, &af, aperture_scale, WF_GRID_SIZE)?;
    tracing::info!("consumed time: {:.3} s", started.elapsed().as_secs_f64());

    let grid = altitude_grid(table.max_altitude, table.size);
    let weights = grid.iter().map(|&h| wf.eval(h)).collect();

    output::write_columns(&table.output_filename, &[grid, weights])
}

#[allow(clippy::too_many_arguments)]
fn grid(
    spectral: SpectralArgs,
    aperture_scale: f64,
    central_obscuration: f64,
    grid_step: f64,
    grid_size: usize,
    altitude: f64,
    output_filename: PathBuf,
) -> Result<()> {
    let (lambda, sf) = filters::make_spectral_filter(
        &spectral.response_filename,
        spectral.mono,
        spectral.carrier,
    )?;
    let af = filters::make_radial_aperture(aperture_scale, central_obscuration, false)?;

    let started = Instant::now();
    let wf = WeightFunctionGrid2d::new(
        sf,
        lambda,
        af,
        aperture_scale,
        grid_step,
        (grid_size, grid_size),
    );
    let tensor = wf.eval(altitude)?;
    tracing::info!("consumed time: {:.3} s", started.elapsed().as_secs_f64());

    output::write_tensor(&output_filename, &tensor)
}

fn mass(spectral: SpectralArgs, table: TableArgs, magnification: f64) -> Result<()> {
    // inner and outer ring diameters of the MASS aperture set, mm on sky
    const INNER: [f64; 4] = [0.00, 1.30, 2.20, 3.90];
    const OUTER: [f64; 4] = [1.27, 2.15, 3.85, 5.50];

    let (lambda, sf) = filters::make_spectral_filter(
        &spectral.response_filename,
        spectral.mono,
        spectral.carrier,
    )?;

    let started = Instant::now();
    let mut weight_functions = Vec::with_capacity(10);

    // one weight function per ring pair, covariances included
    for i in 0..INNER.len() {
        for j in 0..=i {
            let d1 = OUTER[i];
            let eps1 = INNER[i] / OUTER[i];
            let d2 = OUTER[j];
            let eps2 = INNER[j] / OUTER[j];

            let af = CrossAnnular::new(d2 / d1, eps1, eps2)?;
            weight_functions.push(WeightFunction::new(
                &sf,
                lambda,
                &af,
                d1 * magnification,
                WF_GRID_SIZE,
            )?);
        }
    }
    tracing::info!("consumed time: {:.3} s", started.elapsed().as_secs_f64());

    let grid = altitude_grid(table.max_altitude, table.size);
    let mut columns = Vec::with_capacity(weight_functions.len() + 1);
    for wf in &weight_functions {
        columns.push(grid.iter().map(|&h| wf.eval(h)).collect());
    }
    columns.insert(0, grid);

    output::write_columns(&table.output_filename, &columns)
}

fn aperture(size: usize, central_obscuration: f64) -> Result<()> {
    use lib_scint::af::{Annular, Circular, RadialAperture};

    let grid: Vec<f64> = (0..size)
        .map(|i| 5.0 * i as f64 / (size - 1) as f64)
        .collect();

    let circular: Vec<f64> = grid.iter().map(|&u| Circular.eval(u)).collect();
    output::write_columns(
        std::path::Path::new("circular_aperture.csv"),
        &[grid.clone(), circular],
    )?;

    let annular = Annular::new(central_obscuration)?;
    let values: Vec<f64> = grid.iter().map(|&u| annular.eval(u)).collect();
    output::write_columns(std::path::Path::new("annular_aperture.csv"), &[grid, values])
}
