//! Reading the three plain-text sources written by the heat-equation solver:
//! a time vector, a coordinate vector and a field matrix (rows = time steps,
//! columns = flattened spatial samples).
use crate::surface_plots::errors::{PlotError, PlotResult};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use std::fs;
use std::path::Path;

/// Time points, raw coordinates and field values of one simulation run.
/// Read-only after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationData {
    pub time: DVector<f64>,
    /// raw coordinate listing: used as-is in 1D, deduplicated in 2D
    pub coordinates: DVector<f64>,
    /// rows indexed by time, columns by flattened spatial sample
    pub field: DMatrix<f64>,
}

/// Parses one line of whitespace-separated real numbers. `line` is 1-based and
/// only used for error messages.
pub fn parse_row(text: &str, source_name: &str, line: usize) -> PlotResult<Vec<f64>> {
    text.split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(PlotError::malformed(
                source_name,
                line,
                format!("token '{}' is not a finite real number", token),
            )),
            Err(_) => Err(PlotError::malformed(
                source_name,
                line,
                format!("token '{}' is not a real number", token),
            )),
        })
        .collect()
}

/// Sources holding a single vector keep it on their first line.
pub fn parse_vector(text: &str, source_name: &str) -> PlotResult<DVector<f64>> {
    let first = text
        .lines()
        .next()
        .ok_or_else(|| PlotError::malformed(source_name, 1, "source is empty"))?;
    let values = parse_row(first, source_name, 1)?;
    if values.is_empty() {
        return Err(PlotError::malformed(source_name, 1, "no values on the first line"));
    }
    Ok(DVector::from_vec(values))
}

/// One row per non-blank line; all rows must have the same length.
pub fn parse_matrix(text: &str, source_name: &str) -> PlotResult<DMatrix<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = parse_row(line, source_name, i + 1)?;
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(PlotError::malformed(
                    source_name,
                    i + 1,
                    format!(
                        "ragged matrix: row has {} values, previous rows have {}",
                        row.len(),
                        first.len()
                    ),
                ));
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(PlotError::malformed(source_name, 1, "source has no rows"));
    }
    let (nrows, ncols) = (rows.len(), rows[0].len());
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(DMatrix::from_row_slice(nrows, ncols, &flat))
}

fn read_source(path: &Path) -> PlotResult<String> {
    fs::read_to_string(path).map_err(|e| PlotError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

impl SimulationData {
    /// Builds the data set from in-memory text and checks that the field has
    /// one row per time point.
    pub fn from_strs(
        time_text: &str,
        coordinates_text: &str,
        field_text: &str,
        names: (&str, &str, &str),
    ) -> PlotResult<Self> {
        let time = parse_vector(time_text, names.0)?;
        let coordinates = parse_vector(coordinates_text, names.1)?;
        let field = parse_matrix(field_text, names.2)?;
        if field.nrows() != time.len() {
            return Err(PlotError::malformed(
                names.2,
                field.nrows(),
                format!(
                    "field has {} rows but {} lists {} time points",
                    field.nrows(),
                    names.0,
                    time.len()
                ),
            ));
        }
        debug!(
            "parsed {} time points, {} coordinates, field {}x{}",
            time.len(),
            coordinates.len(),
            field.nrows(),
            field.ncols()
        );
        Ok(SimulationData {
            time,
            coordinates,
            field,
        })
    }

    pub fn load<P: AsRef<Path>>(time_path: P, coordinates_path: P, field_path: P) -> PlotResult<Self> {
        let (tp, cp, fp) = (
            time_path.as_ref(),
            coordinates_path.as_ref(),
            field_path.as_ref(),
        );
        let data = SimulationData::from_strs(
            &read_source(tp)?,
            &read_source(cp)?,
            &read_source(fp)?,
            (
                &tp.display().to_string(),
                &cp.display().to_string(),
                &fp.display().to_string(),
            ),
        )?;
        info!(
            "loaded {}: {} time points, {}: {} coordinates, {}: {}x{} field",
            tp.display(),
            data.n_times(),
            cp.display(),
            data.coordinates.len(),
            fp.display(),
            data.field.nrows(),
            data.field.ncols()
        );
        Ok(data)
    }

    pub fn n_times(&self) -> usize {
        self.time.len()
    }

    pub fn n_samples(&self) -> usize {
        self.field.ncols()
    }

    /// Maximum over the whole field, every time step included.
    pub fn global_max(&self) -> f64 {
        self.field.max()
    }

    pub fn global_min(&self) -> f64 {
        self.field.min()
    }
}
