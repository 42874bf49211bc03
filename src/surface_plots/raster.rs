//! plotters rasteriser of a [`Scene`]: 3D surface panel on the left, colour
//! bar panel on the right. Generic over the drawing backend so the same code
//! feeds PNG files and GIF frames.
use crate::surface_plots::errors::PlotResult;
use crate::surface_plots::figure::{Colorbar, Scene, Surface};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const FONT: &str = "sans-serif";
/// pixel width reserved for the colour bar panel
const BAR_PANEL: u32 = 120;

/// Expands an empty or inverted range so the coordinate mapping stays finite.
pub fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo > f64::EPSILON * lo.abs().max(hi.abs()).max(1.0) {
        (lo, hi)
    } else {
        let mid = 0.5 * (lo + hi);
        (mid - 0.5, mid + 0.5)
    }
}

pub fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> PlotResult<()> {
    root.fill(&WHITE)?;
    if scene.title.is_empty() {
        draw_panels(root, scene)
    } else {
        draw_panels(&root.titled(&scene.title, (FONT, 20))?, scene)
    }
}

fn draw_panels<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> PlotResult<()> {
    let (width, _) = root.dim_in_pixel();
    let (plot_area, bar_area) = root.split_horizontally(width.saturating_sub(BAR_PANEL) as i32);

    if let Some([xb, yb, zb]) = scene.data_bounds() {
        let (x_lo, x_hi) = padded(xb.0, xb.1);
        let (y_lo, y_hi) = padded(yb.0, yb.1);
        let (z_lo, z_hi) = {
            let (lo, hi) = scene.z_limits.unwrap_or(zb);
            padded(lo, hi)
        };

        // plotters puts the vertical axis second: (x, value, y)
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(20)
            .build_cartesian_3d(x_lo..x_hi, z_lo..z_hi, y_lo..y_hi)?;
        chart.with_projection(|mut pb| {
            pb.yaw = 0.8;
            pb.pitch = 0.35;
            pb.scale = 0.8;
            pb.into_matrix()
        });
        let value_fmt = |v: &f64| format!("{:.2}", v);
        chart
            .configure_axes()
            .light_grid_style(BLACK.mix(0.15))
            .max_light_lines(3)
            .y_labels(10)
            .y_formatter(&value_fmt)
            .draw()?;

        for (_, surface) in &scene.surfaces {
            chart.draw_series(surface_quads(surface, (z_lo, z_hi)))?;
        }

        let labels = vec![
            Text::new(
                scene.labels.x.clone(),
                (0.5 * (x_lo + x_hi), z_lo, y_lo),
                (FONT, 14).into_font(),
            ),
            Text::new(
                scene.labels.y.clone(),
                depth_label_anchor((x_lo, x_hi), z_lo, (y_lo, y_hi)),
                TextStyle::from((FONT, 14).into_font()).pos(Pos::new(HPos::Left, VPos::Center)),
            ),
            Text::new(
                scene.labels.z.clone(),
                (x_lo, z_hi, y_hi),
                (FONT, 14).into_font(),
            ),
        ];
        chart.draw_series(labels)?;
    }

    if !scene.colorbars.is_empty() {
        let panels = bar_area.split_evenly((1, scene.colorbars.len()));
        for (panel, (_, bar)) in panels.iter().zip(scene.colorbars.iter()) {
            draw_colorbar(panel, bar)?;
        }
    }
    Ok(())
}

/// Left anchor of the depth-axis label: mid-depth, past the tick labels on the x_hi side.
pub fn depth_label_anchor(x: (f64, f64), z_lo: f64, y: (f64, f64)) -> (f64, f64, f64) {
    (x.1 + 0.12 * (x.1 - x.0), z_lo, 0.5 * (y.0 + y.1))
}

/// One filled quad per mesh cell, coloured by the mean of its four corners.
/// Heights are clamped into the value-axis range.
pub fn surface_quads(surface: &Surface, z_range: (f64, f64)) -> Vec<Polygon<(f64, f64, f64)>> {
    let (rows, cols) = surface.values.shape();
    let mut quads = Vec::with_capacity(rows.saturating_sub(1) * cols.saturating_sub(1));
    for i in 0..rows.saturating_sub(1) {
        for j in 0..cols.saturating_sub(1) {
            let corners = [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)];
            let mean = corners.iter().map(|&c| surface.values[c]).sum::<f64>() / 4.0;
            let color = surface
                .cmap
                .color_normalized(mean, surface.vmin, surface.vmax);
            let points: Vec<(f64, f64, f64)> = corners
                .iter()
                .map(|&c| {
                    (
                        surface.mesh.x[c],
                        surface.values[c].clamp(z_range.0, z_range.1),
                        surface.mesh.y[c],
                    )
                })
                .collect();
            quads.push(Polygon::new(points, color.filled()));
        }
    }
    quads
}

fn draw_colorbar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, bar: &Colorbar) -> PlotResult<()> {
    let (w, h) = area.dim_in_pixel();
    let bar_h = (h as f64 * bar.shrink).max(10.0);
    let bar_w = (bar_h / bar.aspect).clamp(4.0, w as f64 / 3.0);
    let v_margin = ((h as f64 - bar_h) / 2.0).max(0.0) as u32;
    let label_w = 60u32;
    let right = w.saturating_sub(5 + bar_w as u32 + label_w);
    let (vmin, vmax) = padded(bar.vmin, bar.vmax);

    let mut chart = ChartBuilder::on(area)
        .margin_top(v_margin)
        .margin_bottom(v_margin)
        .margin_left(5)
        .margin_right(right)
        .right_y_label_area_size(label_w)
        .build_cartesian_2d(0.0..1.0, vmin..vmax)?;

    let steps = 64;
    chart.draw_series((0..steps).map(|s| {
        let v0 = vmin + (vmax - vmin) * s as f64 / steps as f64;
        let v1 = vmin + (vmax - vmin) * (s + 1) as f64 / steps as f64;
        let color = bar.cmap.color_normalized(0.5 * (v0 + v1), bar.vmin, bar.vmax);
        Rectangle::new([(0.0, v0), (1.0, v1)], color.filled())
    }))?;
    let value_fmt = |v: &f64| format!("{:.2}", v);
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(8)
        .y_label_style((FONT, 12))
        .y_label_formatter(&value_fmt)
        .draw()?;
    chart
        .plotting_area()
        .draw(&Rectangle::new([(0.0, vmin), (1.0, vmax)], BLACK.stroke_width(1)))?;
    Ok(())
}
