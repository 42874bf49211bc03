//! Mutable figure state shared by the renderers.
//!
//! A [`Figure`] holds one [`Scene`] (title, axis labels, z-limits, attached
//! surfaces and colour bars) and a [`FrameSink`] that turns the scene into
//! pixels on every [`Figure::flush`]. Surfaces are released explicitly through
//! their [`SurfaceId`]; colour bars are attached through a guard that detaches
//! them when it goes out of scope, so a bar never outlives its frame.
use crate::surface_plots::colormap::ColorMapKind;
use crate::surface_plots::errors::{PlotError, PlotResult};
use crate::surface_plots::grid::Mesh;
use crate::surface_plots::raster::draw_scene;
use log::debug;
use nalgebra::DMatrix;
use plotters::prelude::*;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorbarId(u64);

/// Surface geometry: mesh plus one value per mesh node
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub mesh: Mesh,
    pub values: DMatrix<f64>,
    pub cmap: ColorMapKind,
    /// colour scale
    pub vmin: f64,
    pub vmax: f64,
}

impl Surface {
    /// Surface coloured over the full value range of `values`.
    pub fn auto_scaled(mesh: Mesh, values: DMatrix<f64>, cmap: ColorMapKind) -> PlotResult<Self> {
        let (vmin, vmax) = (values.min(), values.max());
        Surface::new(mesh, values, cmap, vmin, vmax)
    }

    pub fn new(
        mesh: Mesh,
        values: DMatrix<f64>,
        cmap: ColorMapKind,
        vmin: f64,
        vmax: f64,
    ) -> PlotResult<Self> {
        if mesh.shape() != values.shape() || mesh.y.shape() != values.shape() {
            return Err(PlotError::shape(
                "surface mesh vs values",
                format!("{}x{}", mesh.shape().0, mesh.shape().1),
                format!("{}x{}", values.nrows(), values.ncols()),
            ));
        }
        Ok(Surface {
            mesh,
            values,
            cmap,
            vmin,
            vmax,
        })
    }
}

/// Colour legend. `shrink` is the bar height relative to the plot height,
/// `aspect` the ratio of bar height to bar width.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub cmap: ColorMapKind,
    pub vmin: f64,
    pub vmax: f64,
    pub shrink: f64,
    pub aspect: f64,
}

impl Colorbar {
    pub fn for_surface(surface: &Surface) -> Self {
        Colorbar {
            cmap: surface.cmap,
            vmin: surface.vmin,
            vmax: surface.vmax,
            shrink: 0.5,
            aspect: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
    pub z: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: String,
    pub labels: AxisLabels,
    /// fixed value-axis range; data range when `None`
    pub z_limits: Option<(f64, f64)>,
    pub surfaces: Vec<(SurfaceId, Surface)>,
    pub colorbars: Vec<(ColorbarId, Colorbar)>,
}

impl Scene {
    pub fn new(labels: AxisLabels) -> Self {
        Scene {
            title: String::new(),
            labels,
            z_limits: None,
            surfaces: Vec::new(),
            colorbars: Vec::new(),
        }
    }

    /// (min, max) of x, y and values over all attached surfaces
    pub fn data_bounds(&self) -> Option<[(f64, f64); 3]> {
        let mut bounds: Option<[(f64, f64); 3]> = None;
        for (_, s) in &self.surfaces {
            let b = [
                (s.mesh.x.min(), s.mesh.x.max()),
                (s.mesh.y.min(), s.mesh.y.max()),
                (s.values.min(), s.values.max()),
            ];
            bounds = Some(match bounds {
                None => b,
                Some(acc) => [0, 1, 2].map(|i| (acc[i].0.min(b[i].0), acc[i].1.max(b[i].1))),
            });
        }
        bounds
    }
}

/// Destination of flushed scenes: one call to `draw` per produced frame.
pub trait FrameSink {
    fn draw(&mut self, scene: &Scene) -> PlotResult<()>;
    fn finish(&mut self) -> PlotResult<()> {
        Ok(())
    }
}

pub struct Figure<S: FrameSink> {
    scene: Scene,
    sink: S,
    next_id: u64,
    frames: usize,
}

impl<S: FrameSink> Figure<S> {
    pub fn new(sink: S, labels: AxisLabels) -> Self {
        Figure {
            scene: Scene::new(labels),
            sink,
            next_id: 0,
            frames: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frames_flushed(&self) -> usize {
        self.frames
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.scene.title = title.into();
    }

    pub fn set_z_limits(&mut self, lo: f64, hi: f64) {
        self.scene.z_limits = Some((lo, hi));
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_surface(&mut self, surface: Surface) -> SurfaceId {
        let id = SurfaceId(self.fresh_id());
        self.scene.surfaces.push((id, surface));
        id
    }

    pub fn remove_surface(&mut self, id: SurfaceId) -> PlotResult<Surface> {
        let pos = self
            .scene
            .surfaces
            .iter()
            .position(|(sid, _)| *sid == id)
            .ok_or_else(|| PlotError::Render(format!("surface {:?} is not attached", id)))?;
        Ok(self.scene.surfaces.remove(pos).1)
    }

    /// Attaches `bar` until the returned guard is dropped.
    pub fn attach_colorbar(&mut self, bar: Colorbar) -> AttachedColorbar<'_, S> {
        let id = ColorbarId(self.fresh_id());
        self.scene.colorbars.push((id, bar));
        AttachedColorbar { figure: self, id }
    }

    fn detach_colorbar(&mut self, id: ColorbarId) {
        self.scene.colorbars.retain(|(cid, _)| *cid != id);
    }

    /// Renders the current scene as one frame.
    pub fn flush(&mut self) -> PlotResult<()> {
        self.sink.draw(&self.scene)?;
        self.frames += 1;
        debug!(
            "frame {} flushed: {} surface(s), {} colour bar(s)",
            self.frames,
            self.scene.surfaces.len(),
            self.scene.colorbars.len()
        );
        Ok(())
    }

    pub fn finish(mut self) -> PlotResult<S> {
        self.sink.finish()?;
        Ok(self.sink)
    }
}

/// Colour bar attached to a figure; detached on drop.
pub struct AttachedColorbar<'a, S: FrameSink> {
    figure: &'a mut Figure<S>,
    id: ColorbarId,
}

impl<S: FrameSink> Deref for AttachedColorbar<'_, S> {
    type Target = Figure<S>;
    fn deref(&self) -> &Figure<S> {
        self.figure
    }
}

impl<S: FrameSink> DerefMut for AttachedColorbar<'_, S> {
    fn deref_mut(&mut self) -> &mut Figure<S> {
        self.figure
    }
}

impl<S: FrameSink> Drop for AttachedColorbar<'_, S> {
    fn drop(&mut self) {
        self.figure.detach_colorbar(self.id);
    }
}

/// Writes every flushed frame to the same PNG file.
pub struct PngSink {
    path: PathBuf,
    size: (u32, u32),
}

impl PngSink {
    pub fn new<P: AsRef<Path>>(path: P, size: (u32, u32)) -> Self {
        PngSink {
            path: path.as_ref().to_path_buf(),
            size,
        }
    }
}

impl FrameSink for PngSink {
    fn draw(&mut self, scene: &Scene) -> PlotResult<()> {
        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        draw_scene(&root, scene)?;
        root.present()?;
        Ok(())
    }
}

/// Looping GIF, one image per flushed frame. Borrows the output path for as
/// long as the encoder is open.
pub struct GifSink<'a> {
    root: DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>,
}

impl<'a> GifSink<'a> {
    pub fn new(path: &'a Path, size: (u32, u32), fps: f64) -> PlotResult<Self> {
        let backend = BitMapBackend::gif(path, size, frame_delay_ms(fps))
            .map_err(|e| PlotError::Render(format!("cannot open {}: {}", path.display(), e)))?;
        Ok(GifSink {
            root: backend.into_drawing_area(),
        })
    }
}

/// Delay between GIF frames for the export frame rate.
pub fn frame_delay_ms(fps: f64) -> u32 {
    (1000.0 / fps).round().max(1.0) as u32
}

impl FrameSink for GifSink<'_> {
    fn draw(&mut self, scene: &Scene) -> PlotResult<()> {
        draw_scene(&self.root, scene)?;
        self.root.present()?;
        Ok(())
    }
}
