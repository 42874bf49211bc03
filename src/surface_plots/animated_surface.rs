//! Animated sweep of the 2D field over time.
//!
//! Setup ([`AnimationPlan`]) truncates the time series at the cutoff, derives
//! dt and the playback rate and fixes the value axis to `[0, global max]`.
//! The frame loop ([`AnimationContext`]) then, for each retained time step:
//! sets the title, releases the previous surface, fixes the z-limits, adds the
//! new surface, attaches a colour bar, flushes one frame and detaches the bar.
use crate::surface_plots::colormap::ColorMapKind;
use crate::surface_plots::data_loader::SimulationData;
use crate::surface_plots::errors::{PlotError, PlotResult};
use crate::surface_plots::figure::{AxisLabels, Colorbar, Figure, FrameSink, Surface, SurfaceId};
use crate::surface_plots::grid::Grid2D;
use crate::surface_plots::model_info::ModelInfo;
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};

/// Leading time points strictly below `cutoff`; all of them when `cutoff` is `None`.
pub fn truncate_times(time: &DVector<f64>, cutoff: Option<f64>) -> DVector<f64> {
    match cutoff {
        None => time.clone(),
        Some(c) => {
            let kept: Vec<f64> = time.iter().copied().take_while(|&t| t < c).collect();
            DVector::from_vec(kept)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlan {
    /// retained time points, one per frame
    pub times: DVector<f64>,
    pub cutoff: Option<f64>,
    /// difference of the first two retained time points
    pub dt: f64,
    /// 1/dt, frames per simulated second
    pub playback_rate: f64,
    /// maximum of the whole field, not only of the retained frames
    pub z_max: f64,
}

impl AnimationPlan {
    pub fn new(data: &SimulationData, cutoff: Option<f64>) -> PlotResult<Self> {
        let times = truncate_times(&data.time, cutoff);
        let n = times.len();
        let increasing = times.as_slice().windows(2).all(|w| w[1] > w[0]);
        if n < 2 || !increasing {
            return Err(PlotError::InsufficientFrames {
                retained: n,
                cutoff,
            });
        }
        let dt = times[1] - times[0];
        let z_max = data.global_max();
        if z_max <= 0.0 {
            warn!(
                "global field maximum {} is not positive; value axis [0, {}] is degenerate",
                z_max, z_max
            );
        }
        let plan = AnimationPlan {
            times,
            cutoff,
            dt,
            playback_rate: 1.0 / dt,
            z_max,
        };
        info!(
            "animation plan: {} frames, dt = {}, playback rate = {:.4} 1/s, z in [0, {:.4}]",
            plan.n_frames(),
            plan.dt,
            plan.playback_rate,
            plan.z_max
        );
        Ok(plan)
    }

    pub fn n_frames(&self) -> usize {
        self.times.len()
    }
}

/// Snapshot of one time step; lives for a single loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub idx: usize,
    pub time: f64,
    /// `k x k` slice of the field
    pub values: DMatrix<f64>,
}

pub fn animation_labels() -> AxisLabels {
    AxisLabels {
        x: "x-axis".to_string(),
        y: "y-axis".to_string(),
        z: "Temperature [K]".to_string(),
    }
}

/// Per-run renderer state threaded through the frame loop.
pub struct AnimationContext<'a, S: FrameSink> {
    figure: Figure<S>,
    grid: &'a Grid2D,
    plan: &'a AnimationPlan,
    model: &'a ModelInfo,
    cmap: ColorMapKind,
    /// surface drawn by the previous frame, released before the next one is added
    current_surface: Option<SurfaceId>,
}

impl<'a, S: FrameSink> AnimationContext<'a, S> {
    pub fn new(
        sink: S,
        grid: &'a Grid2D,
        plan: &'a AnimationPlan,
        model: &'a ModelInfo,
        cmap: ColorMapKind,
    ) -> Self {
        AnimationContext {
            figure: Figure::new(sink, animation_labels()),
            grid,
            plan,
            model,
            cmap,
            current_surface: None,
        }
    }

    pub fn figure(&self) -> &Figure<S> {
        &self.figure
    }

    pub fn render_frame(&mut self, frame: Frame) -> PlotResult<()> {
        self.figure.set_title(self.model.frame_title(frame.time));
        if let Some(previous) = self.current_surface.take() {
            self.figure.remove_surface(previous)?;
        }
        self.figure.set_z_limits(0.0, self.plan.z_max);
        let surface = Surface::new(
            self.grid.mesh.clone(),
            frame.values,
            self.cmap,
            0.0,
            self.plan.z_max,
        )?;
        let bar = Colorbar::for_surface(&surface);
        self.current_surface = Some(self.figure.add_surface(surface));

        let mut attached = self.figure.attach_colorbar(bar);
        attached.flush()?;
        debug!("frame {} (t = {}) rendered", frame.idx, frame.time);
        Ok(())
    }

    pub fn finish(self) -> PlotResult<S> {
        self.figure.finish()
    }
}

/// Reshapes every retained time step. Runs before anything is drawn, so a
/// field that does not fit the grid never produces output.
pub fn prepare_frames(data: &SimulationData, grid: &Grid2D, plan: &AnimationPlan) -> PlotResult<Vec<Frame>> {
    if plan.n_frames() > data.field.nrows() {
        return Err(PlotError::shape(
            "animation plan vs field rows",
            format!("at most {} frames", data.field.nrows()),
            format!("{} frames", plan.n_frames()),
        ));
    }
    (0..plan.n_frames())
        .map(|idx| {
            Ok(Frame {
                idx,
                time: plan.times[idx],
                values: grid.frame(&data.field, idx)?,
            })
        })
        .collect()
}

/// Frame loop over already validated frames; the first failing frame aborts the run.
pub fn render_frames<S: FrameSink>(
    frames: Vec<Frame>,
    grid: &Grid2D,
    plan: &AnimationPlan,
    model: &ModelInfo,
    cmap: ColorMapKind,
    sink: S,
) -> PlotResult<S> {
    let mut ctx = AnimationContext::new(sink, grid, plan, model, cmap);
    for frame in frames {
        ctx.render_frame(frame)?;
    }
    info!("{} frames rendered", ctx.figure().frames_flushed());
    ctx.finish()
}

pub fn render_animation<S: FrameSink>(
    data: &SimulationData,
    grid: &Grid2D,
    plan: &AnimationPlan,
    model: &ModelInfo,
    cmap: ColorMapKind,
    sink: S,
) -> PlotResult<S> {
    let frames = prepare_frames(data, grid, plan)?;
    render_frames(frames, grid, plan, model, cmap, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface_plots::figure::tests::RecordingSink;
    use approx::assert_relative_eq;

    const NAMES: (&str, &str, &str) = ("time.txt", "coordinates.txt", "temp.txt");

    fn data_2d(times: &str, rows: &[[f64; 4]]) -> SimulationData {
        let field: String = rows
            .iter()
            .map(|r| format!("{} {} {} {}\n", r[0], r[1], r[2], r[3]))
            .collect();
        SimulationData::from_strs(times, "0 0 1 1 0 1 1 0", &field, NAMES).unwrap()
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let t = DVector::from_vec(vec![0.0, 0.2, 0.4, 0.6, 0.8]);
        let once = truncate_times(&t, Some(0.6));
        let twice = truncate_times(&once, Some(0.6));
        assert_eq!(once.len(), 3);
        assert_eq!(once, twice);
        assert_eq!(truncate_times(&t, None).len(), 5);
    }

    #[test]
    fn test_frame_rate_derivation() {
        let data = data_2d("0.0 0.1 0.2 0.3", &[[1.0; 4], [1.0; 4], [1.0; 4], [1.0; 4]]);
        let plan = AnimationPlan::new(&data, None).unwrap();
        assert_eq!(plan.n_frames(), 4);
        assert_relative_eq!(plan.dt, 0.1, epsilon = 1e-12);
        assert_relative_eq!(plan.playback_rate, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_z_bound_uses_whole_field() {
        // peak of 42 sits at t = 0.9, beyond the cutoff
        let data = data_2d(
            "0.0 0.3 0.9",
            &[[1.0, 2.0, 3.0, 4.0], [0.5, 1.0, 1.5, 2.0], [0.0, 42.0, 0.0, 0.0]],
        );
        let plan = AnimationPlan::new(&data, Some(0.6)).unwrap();
        assert_eq!(plan.n_frames(), 2);
        assert_relative_eq!(plan.z_max, 42.0);
    }

    #[test]
    fn test_scenario_c_insufficient_frames() {
        let data = data_2d("0.5 0.7", &[[1.0; 4], [1.0; 4]]);
        let err = AnimationPlan::new(&data, Some(0.6)).unwrap_err();
        assert_eq!(
            err,
            PlotError::InsufficientFrames {
                retained: 1,
                cutoff: Some(0.6)
            }
        );
    }

    #[test]
    fn test_non_increasing_times_rejected() {
        let data = data_2d("0.0 0.0 0.1", &[[1.0; 4], [1.0; 4], [1.0; 4]]);
        assert!(matches!(
            AnimationPlan::new(&data, None),
            Err(PlotError::InsufficientFrames { .. })
        ));
    }

    #[test]
    fn test_frame_lifecycle() {
        let data = data_2d(
            "0.0 0.1 0.2 0.7",
            &[
                [1.0, 2.0, 3.0, 4.0],
                [0.9, 1.8, 2.7, 3.6],
                [0.8, 1.6, 2.4, 3.2],
                [0.1, 0.2, 0.3, 9.0],
            ],
        );
        let grid = Grid2D::reconstruct(&data.coordinates, data.field.ncols()).unwrap();
        let plan = AnimationPlan::new(&data, Some(0.6)).unwrap();
        let model = ModelInfo::default();
        let sink = render_animation(
            &data,
            &grid,
            &plan,
            &model,
            ColorMapKind::Jet,
            RecordingSink::default(),
        )
        .unwrap();

        assert!(sink.finished);
        assert_eq!(sink.frames.len(), 3);
        for (idx, scene) in sink.frames.iter().enumerate() {
            // exactly one surface and one colour bar per produced frame
            assert_eq!(scene.surfaces.len(), 1);
            assert_eq!(scene.colorbars.len(), 1);
            assert_eq!(scene.z_limits, Some((0.0, 9.0)));
            assert_eq!(scene.title, model.frame_title(plan.times[idx]));
            let surface = &scene.surfaces[0].1;
            assert_eq!(surface.values.shape(), (2, 2));
            assert_eq!((surface.vmin, surface.vmax), (0.0, 9.0));
            assert_relative_eq!(surface.values[(1, 1)], data.field[(idx, 3)]);
        }
        // each frame carries a fresh surface
        assert_ne!(sink.frames[0].surfaces[0].0, sink.frames[1].surfaces[0].0);
    }

    #[test]
    fn test_context_releases_previous_surface() {
        let data = data_2d("0.0 0.1", &[[1.0; 4], [2.0; 4]]);
        let grid = Grid2D::reconstruct(&data.coordinates, 4).unwrap();
        let plan = AnimationPlan::new(&data, None).unwrap();
        let model = ModelInfo::default();
        let frames = prepare_frames(&data, &grid, &plan).unwrap();
        let mut ctx =
            AnimationContext::new(RecordingSink::default(), &grid, &plan, &model, ColorMapKind::Jet);
        for frame in frames {
            ctx.render_frame(frame).unwrap();
            assert_eq!(ctx.figure().scene().surfaces.len(), 1);
            assert!(ctx.figure().scene().colorbars.is_empty());
        }
        assert_eq!(ctx.figure().frames_flushed(), 2);
    }

    #[test]
    fn test_bad_frame_aborts_run() {
        let data = data_2d("0.0 0.1", &[[1.0; 4], [2.0; 4]]);
        // grid built for a 3x3 field cannot reshape rows of 4 values
        let grid = Grid2D::reconstruct(&DVector::from_vec(vec![0.0, 0.5, 1.0]), 9).unwrap();
        let plan = AnimationPlan::new(&data, None).unwrap();
        let result = render_animation(
            &data,
            &grid,
            &plan,
            &ModelInfo::default(),
            ColorMapKind::Jet,
            RecordingSink::default(),
        );
        assert!(matches!(result, Err(PlotError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_prepare_frames_reshapes_every_retained_step() {
        let data = data_2d("0.0 0.1 0.9", &[[1.0, 2.0, 3.0, 4.0], [5.0, 6.0, 7.0, 8.0], [0.0; 4]]);
        let grid = Grid2D::reconstruct(&data.coordinates, 4).unwrap();
        let plan = AnimationPlan::new(&data, Some(0.6)).unwrap();
        let frames = prepare_frames(&data, &grid, &plan).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].time, 0.1);
        assert_eq!(frames[1].values, DMatrix::from_row_slice(2, 2, &[5.0, 6.0, 7.0, 8.0]));

        let wrong = Grid2D::reconstruct(&DVector::from_vec(vec![0.0, 0.5, 1.0]), 9).unwrap();
        assert!(matches!(
            prepare_frames(&data, &wrong, &plan),
            Err(PlotError::ShapeMismatch { .. })
        ));
    }
}
