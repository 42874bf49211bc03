use csv::Writer;
use nalgebra::{DMatrix, DVector};
use std::fs::File;
use std::path::Path;

/// column headers of the spatial samples: `x=<value>` when every column has its
/// own coordinate (1D), `s<index>` for flattened 2D samples
pub fn sample_headers(coordinates: &DVector<f64>, ncols: usize) -> Vec<String> {
    if coordinates.len() == ncols {
        coordinates.iter().map(|x| format!("x={}", x)).collect()
    } else {
        (0..ncols).map(|j| format!("s{}", j)).collect()
    }
}

/// Writes the field as a table: a `t` column followed by one column per
/// spatial sample, one row per time step.
pub fn save_field_to_csv<P: AsRef<Path>>(
    time: &DVector<f64>,
    coordinates: &DVector<f64>,
    field: &DMatrix<f64>,
    path: P,
) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);

    let mut headers = vec!["t".to_string()];
    headers.extend(sample_headers(coordinates, field.ncols()));
    writer.write_record(&headers)?;

    for (i, row) in field.row_iter().enumerate() {
        let mut row_data = Vec::with_capacity(field.ncols() + 1);
        row_data.push(time[i].to_string());
        row_data.extend(row.iter().map(|&val| val.to_string()));
        writer.write_record(&row_data)?;
    }

    writer.flush()?;
    Ok(())
}
