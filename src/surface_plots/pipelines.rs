//! End-to-end runs driven by a [`RenderTask`]: set up logging, load the three
//! data files, render, optionally dump the data to CSV and print a summary.
//!
//! `render_*_with` take any [`FrameSink`] and do no terminal output, the
//! `run_*` wrappers pick the file sinks from the task.
use crate::Utils::export::save_field_to_csv;
use crate::Utils::logger::{init_logger, parse_level};
use crate::Utils::summary::RunSummary;
use crate::surface_plots::animated_surface::{AnimationPlan, Frame, prepare_frames, render_frames};
use crate::surface_plots::data_loader::SimulationData;
use crate::surface_plots::errors::{PlotError, PlotResult};
use crate::surface_plots::figure::{FrameSink, GifSink, PngSink, frame_delay_ms};
use crate::surface_plots::grid::Grid2D;
use crate::surface_plots::static_surface::{StaticRender, render_static};
use crate::surface_plots::task::{LoggingOptions, RenderTask};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct StaticReport {
    pub render: StaticRender,
    pub csv: Option<PathBuf>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationReport {
    pub plan: AnimationPlan,
    /// side length of the reconstructed grid
    pub k: usize,
    pub csv: Option<PathBuf>,
    pub summary: RunSummary,
}

pub fn init_logging(options: &LoggingOptions) -> PlotResult<Option<PathBuf>> {
    let level = parse_level(&options.level).map_err(PlotError::Config)?;
    let path = init_logger(level, options.log_to_file)?;
    if let Some(p) = &path {
        info!("logging into {}", p.display());
    }
    Ok(path)
}

pub fn load_data(task: &RenderTask) -> PlotResult<SimulationData> {
    SimulationData::load(&task.data.time, &task.data.coordinates, &task.data.field)
}

fn export_csv(task: &RenderTask, data: &SimulationData) -> PlotResult<Option<PathBuf>> {
    match &task.csv_export {
        None => Ok(None),
        Some(path) => {
            save_field_to_csv(&data.time, &data.coordinates, &data.field, path)?;
            info!("data exported to {}", path.display());
            Ok(Some(path.clone()))
        }
    }
}

fn data_rows(summary: &mut RunSummary, data: &SimulationData) {
    summary
        .push("time steps", data.n_times())
        .push("spatial samples", data.n_samples())
        .push("field min", format!("{:.4}", data.global_min()))
        .push("field max", format!("{:.4}", data.global_max()));
}

/// Static (x, t) surface of 1D data into `sink`.
pub fn render_static_with<S: FrameSink>(task: &RenderTask, sink: S) -> PlotResult<(StaticReport, S)> {
    let data = load_data(task)?;
    let (render, sink) = render_static(&data, &task.model, task.static_plot.cmap, sink)?;
    let csv = export_csv(task, &data)?;

    let mut summary = RunSummary::new();
    data_rows(&mut summary, &data);
    summary
        .push("mesh", format!("{} x {}", render.mesh_shape.0, render.mesh_shape.1))
        .push("colour map", task.static_plot.cmap);
    Ok((StaticReport { render, csv, summary }, sink))
}

/// Everything the animation needs, checked before an output file is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedAnimation {
    pub data: SimulationData,
    pub grid: Grid2D,
    pub plan: AnimationPlan,
    pub frames: Vec<Frame>,
}

/// Load, grid reconstruction, frame plan and reshaping of every frame.
pub fn prepare_animation(task: &RenderTask) -> PlotResult<PreparedAnimation> {
    let data = load_data(task)?;
    let grid = Grid2D::reconstruct(&data.coordinates, data.n_samples())?;
    let plan = AnimationPlan::new(&data, task.animation.t_cutoff)?;
    let frames = prepare_frames(&data, &grid, &plan)?;
    Ok(PreparedAnimation {
        data,
        grid,
        plan,
        frames,
    })
}

/// Draws a prepared animation into `sink`.
pub fn render_prepared<S: FrameSink>(
    task: &RenderTask,
    prepared: PreparedAnimation,
    sink: S,
) -> PlotResult<(AnimationReport, S)> {
    let PreparedAnimation {
        data,
        grid,
        plan,
        frames,
    } = prepared;
    let sink = render_frames(frames, &grid, &plan, &task.model, task.animation.cmap, sink)?;
    let csv = export_csv(task, &data)?;

    let mut summary = RunSummary::new();
    data_rows(&mut summary, &data);
    summary
        .push("grid", format!("{} x {}", grid.k(), grid.k()))
        .push(
            "t cutoff",
            task.animation
                .t_cutoff
                .map_or("none".to_string(), |c| c.to_string()),
        )
        .push("frames", plan.n_frames())
        .push("dt", plan.dt)
        .push("playback rate [1/s]", format!("{:.4}", plan.playback_rate))
        .push("z max", format!("{:.4}", plan.z_max))
        .push("colour map", task.animation.cmap);
    let k = grid.k();
    Ok((AnimationReport { plan, k, csv, summary }, sink))
}

/// Animated sweep of 2D data into `sink`.
pub fn render_animation_with<S: FrameSink>(
    task: &RenderTask,
    sink: S,
) -> PlotResult<(AnimationReport, S)> {
    let prepared = prepare_animation(task)?;
    render_prepared(task, prepared, sink)
}

/// Removes a half-written output file when `result` is an error.
fn discard_on_error<T>(result: PlotResult<T>, output: &Path) -> PlotResult<T> {
    if result.is_err() && output.exists() {
        match std::fs::remove_file(output) {
            Ok(()) => warn!("incomplete {} removed", output.display()),
            Err(e) => warn!("cannot remove incomplete {}: {}", output.display(), e),
        }
    }
    result
}

fn finish_summary(summary: &mut RunSummary, output: &Path, csv: &Option<PathBuf>, begin: Instant) {
    summary.push("output", output.display());
    if let Some(csv) = csv {
        summary.push("csv", csv.display());
    }
    summary.push("elapsed [ms]", begin.elapsed().as_millis());
}

pub fn run_static(task: &RenderTask) -> PlotResult<StaticReport> {
    init_logging(&task.logging)?;
    let begin = Instant::now();
    let output = task.static_output();
    let sink = PngSink::new(&output, task.static_plot.size);
    let (mut report, _) = render_static_with(task, sink)?;
    info!("static surface saved to {}", output.display());

    finish_summary(&mut report.summary, &output, &report.csv, begin);
    report.summary.print("STATIC SURFACE");
    Ok(report)
}

pub fn run_animation(task: &RenderTask) -> PlotResult<AnimationReport> {
    init_logging(&task.logging)?;
    let begin = Instant::now();
    let prepared = prepare_animation(task)?;
    let dir = &task.animation.output_dir;
    std::fs::create_dir_all(dir).map_err(|e| PlotError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;
    let output = task.animation_output();
    let rendered = GifSink::new(&output, task.animation.size, task.animation.fps)
        .and_then(|sink| render_prepared(task, prepared, sink))
        // the GIF trailer is written when the encoder goes away
        .map(|(report, _)| report);
    let mut report = discard_on_error(rendered, &output)?;
    info!(
        "animation saved to {} ({} ms per frame)",
        output.display(),
        frame_delay_ms(task.animation.fps)
    );

    report.summary.push("export fps", task.animation.fps);
    finish_summary(&mut report.summary, &output, &report.csv, begin);
    report.summary.print("ANIMATED SURFACE");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface_plots::figure::tests::RecordingSink;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    fn task_in(dir: &Path, time: &str, coords: &str, field: &str) -> RenderTask {
        fs::write(dir.join("time.txt"), time).unwrap();
        fs::write(dir.join("coordinates.txt"), coords).unwrap();
        fs::write(dir.join("temp.txt"), field).unwrap();
        let mut task = RenderTask::default();
        task.data.time = dir.join("time.txt");
        task.data.coordinates = dir.join("coordinates.txt");
        task.data.field = dir.join("temp.txt");
        task
    }

    #[test]
    fn test_static_with_recording_sink() {
        let dir = tempdir().unwrap();
        let mut task = task_in(dir.path(), "0 1 2\n", "0.0 1.0\n", "1 2\n3 4\n5 6\n");
        task.csv_export = Some(dir.path().join("field.csv"));
        let (report, sink) = render_static_with(&task, RecordingSink::default()).unwrap();
        assert_eq!(report.render.mesh_shape, (3, 2));
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(report.summary.get("time steps"), Some("3"));
        assert!(dir.path().join("field.csv").exists());
    }

    #[test]
    fn test_animation_with_recording_sink() {
        let dir = tempdir().unwrap();
        let field = "1 2 3 4\n5 6 7 8\n9 10 11 12\n13 14 15 16\n";
        let task = task_in(dir.path(), "0.0 0.2 0.4 0.6\n", "0 0 1 1 0 1 0 1\n", field);
        let (report, sink) = render_animation_with(&task, RecordingSink::default()).unwrap();
        // t = 0.6 is not below the default cutoff
        assert_eq!(report.plan.n_frames(), 3);
        assert_eq!(report.k, 2);
        assert_relative_eq!(report.plan.dt, 0.2, epsilon = 1e-12);
        assert_relative_eq!(report.plan.z_max, 16.0);
        assert_eq!(sink.frames.len(), 3);
        assert!(sink.finished);
        assert_eq!(report.summary.get("frames"), Some("3"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let mut task = RenderTask::default();
        task.data.time = dir.path().join("absent.txt");
        let err = render_static_with(&task, RecordingSink::default()).unwrap_err();
        assert!(matches!(err, PlotError::Io { .. }));
    }

    #[test]
    fn test_unknown_log_level() {
        let options = LoggingOptions {
            level: "chatty".to_string(),
            log_to_file: false,
        };
        assert!(matches!(init_logging(&options), Err(PlotError::Config(_))));
    }

    #[test]
    fn test_prepare_animation_rejects_before_drawing() {
        let dir = tempdir().unwrap();
        let task = task_in(dir.path(), "0.0 0.1\n", "0 0 1 1 0 1 1 0\n", "1 2 3 4 5\n5 4 3 2 1\n");
        assert!(matches!(
            prepare_animation(&task),
            Err(PlotError::ShapeMismatch { .. })
        ));
        let task = task_in(dir.path(), "0.0 0.1\n", "0 1 0 1\n", "1 2 3 4\n4 3 2 1\n");
        let prepared = prepare_animation(&task).unwrap();
        assert_eq!(prepared.frames.len(), 2);
        assert_eq!(prepared.grid.k(), 2);
    }

    #[test]
    fn test_discard_on_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("Laplace 2d.gif");
        fs::write(&output, b"GIF89a").unwrap();
        let kept = discard_on_error(Ok(3), &output);
        assert_eq!(kept, Ok(3));
        assert!(output.exists());

        let failed: PlotResult<()> = discard_on_error(Err(PlotError::Render("draw".to_string())), &output);
        assert!(failed.is_err());
        assert!(!output.exists());
    }
}
