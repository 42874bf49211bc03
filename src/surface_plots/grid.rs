//! Rectangular rendering meshes reconstructed from the raw coordinate listing.
//!
//! * 1D: every coordinate paired with every time point, `n x m` like the field
//!   (rows = time, columns = space).
//! * 2D: the raw listing repeats the single-axis values of every sample; the
//!   axis is recovered by ascending deduplication, the mesh is `k x k` and
//!   every field row of length `k^2` is reshaped row-major into a `k x k` slice.
use crate::surface_plots::errors::{PlotError, PlotResult};
use itertools::Itertools;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// Pair of coordinate grids with identical shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub x: DMatrix<f64>,
    pub y: DMatrix<f64>,
}

impl Mesh {
    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }
}

/// Outer-product expansion: `x[(i, j)] = a[j]`, `y[(i, j)] = b[i]`.
/// The result has `b.len()` rows and `a.len()` columns.
pub fn meshgrid(a: &DVector<f64>, b: &DVector<f64>) -> Mesh {
    let (rows, cols) = (b.len(), a.len());
    Mesh {
        x: DMatrix::from_fn(rows, cols, |_, j| a[j]),
        y: DMatrix::from_fn(rows, cols, |i, _| b[i]),
    }
}

/// (x, t) mesh of the 1D pipeline. Fails fast when it does not cover the field
/// exactly.
pub fn mesh_1d(
    coordinates: &DVector<f64>,
    time: &DVector<f64>,
    field: &DMatrix<f64>,
) -> PlotResult<Mesh> {
    let mesh = meshgrid(coordinates, time);
    if mesh.shape() != field.shape() {
        return Err(PlotError::shape(
            "1D mesh (time x coordinates) vs field",
            format!("{}x{}", mesh.shape().0, mesh.shape().1),
            format!("{}x{}", field.nrows(), field.ncols()),
        ));
    }
    debug!("1D mesh {}x{}", mesh.shape().0, mesh.shape().1);
    Ok(mesh)
}

/// Unique values of the raw listing in ascending order.
///
/// The solver flattens samples with the first axis varying fastest, which makes
/// the ascending order the row-major order of the field. When the order of first
/// appearance in the raw listing disagrees, this is reported but not corrected.
pub fn unique_axis(raw: &DVector<f64>) -> DVector<f64> {
    let sorted: Vec<f64> = raw
        .iter()
        .copied()
        .sorted_by(|a, b| a.total_cmp(b))
        .dedup()
        .collect();
    let first_seen: Vec<f64> = raw
        .iter()
        .copied()
        .unique_by(|v| v.to_bits())
        .collect();
    if first_seen.len() == sorted.len() && first_seen != sorted {
        warn!(
            "coordinate values first appear in non-ascending order; \
             assuming ascending row-major flattening of the field"
        );
    }
    DVector::from_vec(sorted)
}

/// Row-major reshape of `k^2` values into a `k x k` matrix.
pub fn reshape_square(values: &[f64], k: usize, context: &str) -> PlotResult<DMatrix<f64>> {
    if values.len() != k * k {
        return Err(PlotError::shape(
            context.to_string(),
            format!("{} values ({}x{})", k * k, k, k),
            format!("{} values", values.len()),
        ));
    }
    Ok(DMatrix::from_row_slice(k, k, values))
}

/// Square grid of the 2D pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    /// deduplicated, ascending axis values
    pub axis: DVector<f64>,
    /// `k x k`, `x[(i, j)] = axis[j]`, `y[(i, j)] = axis[i]`
    pub mesh: Mesh,
}

impl Grid2D {
    /// Recovers the axis from the raw coordinate listing and checks that `k^2`
    /// equals the field column count.
    pub fn reconstruct(raw_coordinates: &DVector<f64>, field_columns: usize) -> PlotResult<Self> {
        let axis = unique_axis(raw_coordinates);
        let k = axis.len();
        if k * k != field_columns {
            return Err(PlotError::shape(
                "2D grid: (unique coordinate values)^2 vs field columns",
                format!("{} columns ({} unique values squared)", k * k, k),
                format!("{} columns", field_columns),
            ));
        }
        debug!(
            "2D grid: {} raw coordinates -> k = {} unique values",
            raw_coordinates.len(),
            k
        );
        let mesh = meshgrid(&axis, &axis);
        Ok(Grid2D { axis, mesh })
    }

    pub fn k(&self) -> usize {
        self.axis.len()
    }

    /// `k x k` slice of time step `idx`.
    pub fn frame(&self, field: &DMatrix<f64>, idx: usize) -> PlotResult<DMatrix<f64>> {
        if idx >= field.nrows() {
            return Err(PlotError::shape(
                format!("frame {}", idx),
                format!("time index below {}", field.nrows()),
                idx,
            ));
        }
        let row: Vec<f64> = field.row(idx).iter().copied().collect();
        reshape_square(&row, self.k(), &format!("frame {}", idx))
    }
}
