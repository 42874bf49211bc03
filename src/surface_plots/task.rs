//! Typed render configuration read from a task document.
//!
//! ```text
//! data
//!  time: data/time.txt
//!  coordinates: data/coordinates.txt
//!  field: data/temp.txt
//! model
//!  name: Laplace
//!  initial_condition: 10sin(x)
//!  alpha: 0.1
//! static
//!  cmap: jet
//! animation
//!  t_cutoff: 0.6
//!  fps: 10
//!  output_dir: .
//! export
//!  csv: field.csv
//! logging
//!  level: info
//!  log_to_file: false
//! ```
//! Every section and key is optional; defaults reproduce the settings above.
use crate::Utils::task_parser::{DocumentMap, Value, parse_task_document};
use crate::surface_plots::colormap::ColorMapKind;
use crate::surface_plots::errors::{PlotError, PlotResult};
use crate::surface_plots::model_info::ModelInfo;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub time: PathBuf,
    pub coordinates: PathBuf,
    pub field: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            time: PathBuf::from("data/time.txt"),
            coordinates: PathBuf::from("data/coordinates.txt"),
            field: PathBuf::from("data/temp.txt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticOptions {
    pub cmap: ColorMapKind,
    /// `<model name> 1d.png` when not given
    pub output: Option<PathBuf>,
    pub size: (u32, u32),
}

impl Default for StaticOptions {
    fn default() -> Self {
        StaticOptions {
            cmap: ColorMapKind::Jet,
            output: None,
            size: (800, 600),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationOptions {
    /// frames with t >= cutoff are dropped; `None` keeps all
    pub t_cutoff: Option<f64>,
    /// export frame rate of the GIF, independent of the simulation dt
    pub fps: f64,
    pub cmap: ColorMapKind,
    pub output_dir: PathBuf,
    pub size: (u32, u32),
}

impl Default for AnimationOptions {
    fn default() -> Self {
        AnimationOptions {
            t_cutoff: Some(0.6),
            fps: 10.0,
            cmap: ColorMapKind::Jet,
            output_dir: PathBuf::from("."),
            size: (800, 600),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingOptions {
    pub level: String,
    pub log_to_file: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        LoggingOptions {
            level: "info".to_string(),
            log_to_file: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderTask {
    pub data: DataPaths,
    pub model: ModelInfo,
    pub static_plot: StaticOptions,
    pub animation: AnimationOptions,
    /// optional CSV dump of the loaded data
    pub csv_export: Option<PathBuf>,
    pub logging: LoggingOptions,
}

/// first value of `section.key`, if present
fn first<'a>(doc: &'a DocumentMap, section: &str, key: &str) -> Option<&'a Value> {
    doc.get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_ref())
        .and_then(|v| v.first())
}

fn text(doc: &DocumentMap, section: &str, key: &str) -> Option<String> {
    first(doc, section, key).map(|v| v.to_string_value())
}

fn number(doc: &DocumentMap, section: &str, key: &str) -> PlotResult<Option<f64>> {
    match first(doc, section, key) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| {
            PlotError::Config(format!("{}.{} must be a number, got '{}'", section, key, v))
        }),
    }
}

fn positive(doc: &DocumentMap, section: &str, key: &str) -> PlotResult<Option<f64>> {
    match number(doc, section, key)? {
        Some(x) if !(x > 0.0 && x.is_finite()) => Err(PlotError::Config(format!(
            "{}.{} must be positive, got {}",
            section, key, x
        ))),
        other => Ok(other),
    }
}

fn cmap(doc: &DocumentMap, section: &str) -> PlotResult<Option<ColorMapKind>> {
    match text(doc, section, "cmap") {
        None => Ok(None),
        Some(name) => ColorMapKind::from_str(&name)
            .map(Some)
            .map_err(|_| PlotError::Config(format!("{}.cmap: unknown colour map '{}'", section, name))),
    }
}

/// whole number of pixels, at least 1
fn pixels(doc: &DocumentMap, section: &str, key: &str) -> PlotResult<Option<u32>> {
    match first(doc, section, key) {
        None => Ok(None),
        Some(v) => v
            .as_integer()
            .filter(|&n| n >= 1)
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                PlotError::Config(format!(
                    "{}.{} must be a whole number of pixels >= 1, got '{}'",
                    section, key, v
                ))
            }),
    }
}

fn size(doc: &DocumentMap, section: &str, default: (u32, u32)) -> PlotResult<(u32, u32)> {
    let w = pixels(doc, section, "width")?.unwrap_or(default.0);
    let h = pixels(doc, section, "height")?.unwrap_or(default.1);
    Ok((w, h))
}

impl RenderTask {
    pub fn from_document(doc: &DocumentMap) -> PlotResult<Self> {
        let mut task = RenderTask::default();

        if let Some(p) = text(doc, "data", "time") {
            task.data.time = PathBuf::from(p);
        }
        if let Some(p) = text(doc, "data", "coordinates") {
            task.data.coordinates = PathBuf::from(p);
        }
        if let Some(p) = text(doc, "data", "field") {
            task.data.field = PathBuf::from(p);
        }

        if let Some(name) = text(doc, "model", "name") {
            task.model.name = name;
        }
        if let Some(ic) = text(doc, "model", "initial_condition") {
            task.model.initial_condition = ic;
        }
        if let Some(alpha) = number(doc, "model", "alpha")? {
            task.model.alpha = alpha;
        }

        if let Some(c) = cmap(doc, "static")? {
            task.static_plot.cmap = c;
        }
        task.static_plot.output = text(doc, "static", "output").map(PathBuf::from);
        task.static_plot.size = size(doc, "static", task.static_plot.size)?;

        match first(doc, "animation", "t_cutoff") {
            None => {}
            Some(Value::String(s)) if s.eq_ignore_ascii_case("none") => {
                task.animation.t_cutoff = None
            }
            Some(_) => task.animation.t_cutoff = number(doc, "animation", "t_cutoff")?,
        }
        if let Some(fps) = positive(doc, "animation", "fps")? {
            task.animation.fps = fps;
        }
        if let Some(c) = cmap(doc, "animation")? {
            task.animation.cmap = c;
        }
        if let Some(dir) = text(doc, "animation", "output_dir") {
            task.animation.output_dir = PathBuf::from(dir);
        }
        task.animation.size = size(doc, "animation", task.animation.size)?;

        task.csv_export = text(doc, "export", "csv").map(PathBuf::from);

        if let Some(level) = text(doc, "logging", "level") {
            task.logging.level = level;
        }
        match first(doc, "logging", "log_to_file") {
            None => {}
            Some(v) => {
                task.logging.log_to_file = v.as_boolean().ok_or_else(|| {
                    PlotError::Config(format!("logging.log_to_file must be true or false, got '{}'", v))
                })?
            }
        }
        Ok(task)
    }

    pub fn from_str(input: &str) -> PlotResult<Self> {
        let doc = parse_task_document(input).map_err(PlotError::Config)?;
        RenderTask::from_document(&doc)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> PlotResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| PlotError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        RenderTask::from_str(&input)
    }

    pub fn static_output(&self) -> PathBuf {
        self.static_plot
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.model.png_file_name()))
    }

    pub fn animation_output(&self) -> PathBuf {
        self.animation.output_dir.join(self.model.gif_file_name())
    }
}
