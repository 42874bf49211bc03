//! Static 3D surface of the whole 1D space-time field.
use crate::surface_plots::colormap::ColorMapKind;
use crate::surface_plots::data_loader::SimulationData;
use crate::surface_plots::errors::PlotResult;
use crate::surface_plots::figure::{AxisLabels, Colorbar, Figure, FrameSink, Surface};
use crate::surface_plots::grid::mesh_1d;
use crate::surface_plots::model_info::ModelInfo;
use log::info;

#[derive(Debug, Clone, PartialEq)]
pub struct StaticRender {
    /// (time steps, spatial samples)
    pub mesh_shape: (usize, usize),
    /// colour scale and value-axis range
    pub z_range: (f64, f64),
}

pub fn static_labels() -> AxisLabels {
    AxisLabels {
        x: "x-axis".to_string(),
        y: "Time [s]".to_string(),
        z: "Temperature [K]".to_string(),
    }
}

/// Draws the (x, t) surface of the field with a colour bar as a single frame.
pub fn render_static<S: FrameSink>(
    data: &SimulationData,
    model: &ModelInfo,
    cmap: ColorMapKind,
    sink: S,
) -> PlotResult<(StaticRender, S)> {
    let mesh = mesh_1d(&data.coordinates, &data.time, &data.field)?;
    let mesh_shape = mesh.shape();
    let surface = Surface::auto_scaled(mesh, data.field.clone(), cmap)?;
    let z_range = (surface.vmin, surface.vmax);
    let bar = Colorbar::for_surface(&surface);

    let mut figure = Figure::new(sink, static_labels());
    figure.set_title(model.static_title());
    figure.add_surface(surface);
    {
        let mut attached = figure.attach_colorbar(bar);
        attached.flush()?;
    }
    info!(
        "static surface rendered: mesh {}x{}, values {:.4}..{:.4}",
        mesh_shape.0, mesh_shape.1, z_range.0, z_range.1
    );
    let sink = figure.finish()?;
    Ok((StaticRender { mesh_shape, z_range }, sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface_plots::errors::PlotError;
    use crate::surface_plots::figure::tests::RecordingSink;

    fn scenario_a() -> SimulationData {
        SimulationData::from_strs(
            "0 1 2",
            "0 1",
            "1 2\n3 4\n5 6\n",
            ("time.txt", "coordinates.txt", "temp.txt"),
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_a_static_render() {
        let data = scenario_a();
        let (render, sink) = render_static(
            &data,
            &ModelInfo::default(),
            ColorMapKind::Jet,
            RecordingSink::default(),
        )
        .unwrap();
        assert_eq!(render.mesh_shape, (3, 2));
        assert_eq!(render.z_range, (1.0, 6.0));
        assert!(sink.finished);
        assert_eq!(sink.frames.len(), 1);
        let frame = &sink.frames[0];
        assert_eq!(frame.surfaces.len(), 1);
        assert_eq!(frame.colorbars.len(), 1);
        assert_eq!(frame.title, ModelInfo::default().static_title());
        assert_eq!(frame.labels.y, "Time [s]");
        let bounds = frame.data_bounds().unwrap();
        assert_eq!(bounds[2], (1.0, 6.0));
        assert_eq!(bounds[1], (0.0, 2.0));
    }

    #[test]
    fn test_coordinates_must_match_columns() {
        let data = SimulationData::from_strs(
            "0 1 2",
            "0 0.5 1",
            "1 2\n3 4\n5 6\n",
            ("time.txt", "coordinates.txt", "temp.txt"),
        )
        .unwrap();
        let err = render_static(
            &data,
            &ModelInfo::default(),
            ColorMapKind::Jet,
            RecordingSink::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PlotError::ShapeMismatch { .. }));
    }
}
