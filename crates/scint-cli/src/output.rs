//! CSV output for weight-function tables.

use anyhow::{Context, Result};
use ndarray::Array2;
use std::io::Write;
use std::path::Path;

/// Write equally long columns as comma-separated rows.
///
/// The first column is conventionally the altitude grid in km, followed
/// by one weight column per kernel. No header is written.
pub fn write_columns(path: &Path, columns: &[Vec<f64>]) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("failed to create output file {path:?}"))?;

    let rows = columns.first().map_or(0, Vec::len);
    for i in 0..rows {
        let mut line = String::new();
        for (c, column) in columns.iter().enumerate() {
            if c > 0 {
                line.push(',');
            }
            line.push_str(&column[i].to_string());
        }
        writeln!(file, "{line}")?;
    }

    tracing::info!("wrote {} rows to {:?}", rows, path);
    Ok(())
}

/// Write a 2-D weight tensor as comma-separated rows.
pub fn write_tensor(path: &Path, tensor: &Array2<f64>) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("failed to create output file {path:?}"))?;

    for row in tensor.rows() {
        let line = row
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(file, "{line}")?;
    }

    tracing::info!("wrote {:?} tensor to {:?}", tensor.dim(), path);
    Ok(())
}
