//! Rendering of heat/diffusion simulation output
/// error enum shared by the whole crate
pub mod errors;
/// reading time, coordinate and field text files
pub mod data_loader;
/// meshgrids for the 1D space-time surface and the square 2D grid
pub mod grid;
/// named colour maps
pub mod colormap;
/// model description used in titles and file names
pub mod model_info;
/// scene, surfaces, colour bars and frame sinks
pub mod figure;
/// plotters rasteriser for a scene
pub mod raster;
/// static surface of 1D data
pub mod static_surface;
/// animated surface sweep of 2D data
pub mod animated_surface;
/// typed configuration from a task document
pub mod task;
/// end-to-end runs: load, render, export, summary
pub mod pipelines;
