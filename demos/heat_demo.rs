//! Writes exact heat-equation solutions as solver-style text files and renders
//! them: `cargo run --example heat_demo`. Output lands in `heat_demo_output/`.
#![allow(non_snake_case)]
use RustedHeatPlot::surface_plots::errors::PlotResult;
use RustedHeatPlot::surface_plots::pipelines::{run_animation, run_static};
use RustedHeatPlot::surface_plots::task::RenderTask;
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

const ALPHA: f64 = 0.1;

fn line(values: impl Iterator<Item = f64>) -> String {
    values.map(|v| format!("{:.8}", v)).collect::<Vec<_>>().join(" ")
}

/// u(x, t) = 10 sin(x) exp(-alpha t) on [0, pi]
fn write_1d(dir: &Path) -> PlotResult<()> {
    let (n, m) = (41, 30);
    let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.25).collect();
    let xs: Vec<f64> = (0..m).map(|j| PI * j as f64 / (m - 1) as f64).collect();
    let field: Vec<String> = times
        .iter()
        .map(|t| line(xs.iter().map(|x| 10.0 * x.sin() * (-ALPHA * t).exp())))
        .collect();
    fs::write(dir.join("time_1d.txt"), line(times.into_iter()))?;
    fs::write(dir.join("coordinates_1d.txt"), line(xs.into_iter()))?;
    fs::write(dir.join("temp_1d.txt"), field.join("\n"))?;
    Ok(())
}

/// u(x, y, t) = 10 sin(pi x) sin(pi y) exp(-2 pi^2 alpha t) on the unit square,
/// samples flattened row by row
fn write_2d(dir: &Path) -> PlotResult<()> {
    let (n, k) = (12, 20);
    let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.05).collect();
    let axis: Vec<f64> = (0..k).map(|j| j as f64 / (k - 1) as f64).collect();
    let flat_x = (0..k * k).map(|s| axis[s % k]);
    let field: Vec<String> = times
        .iter()
        .map(|t| {
            let decay = (-2.0 * PI * PI * ALPHA * t).exp();
            line((0..k * k).map(|s| {
                let (y, x) = (axis[s / k], axis[s % k]);
                10.0 * (PI * x).sin() * (PI * y).sin() * decay
            }))
        })
        .collect();
    fs::write(dir.join("time_2d.txt"), line(times.into_iter()))?;
    fs::write(dir.join("coordinates_2d.txt"), line(flat_x))?;
    fs::write(dir.join("temp_2d.txt"), field.join("\n"))?;
    Ok(())
}

fn main() -> PlotResult<()> {
    let dir = Path::new("heat_demo_output");
    fs::create_dir_all(dir)?;
    write_1d(dir)?;
    write_2d(dir)?;

    let mut task = RenderTask::default();
    task.model.alpha = ALPHA;
    task.data.time = dir.join("time_1d.txt");
    task.data.coordinates = dir.join("coordinates_1d.txt");
    task.data.field = dir.join("temp_1d.txt");
    task.static_plot.output = Some(dir.join(task.model.png_file_name()));
    run_static(&task)?;

    task.data.time = dir.join("time_2d.txt");
    task.data.coordinates = dir.join("coordinates_2d.txt");
    task.data.field = dir.join("temp_2d.txt");
    task.animation.output_dir = dir.to_path_buf();
    task.csv_export = Some(dir.join("field_2d.csv"));
    run_animation(&task)?;
    Ok(())
}
