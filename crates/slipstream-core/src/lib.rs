//! Core types shared by the slipstream crates.
//!
//! Everything here is plain data: the light/dark theme flag and the
//! per-theme rendering constants hanging off it, color and geometry
//! records, and [`FlowConfig`], which carries every tunable of the
//! flow-field animation with its default.

mod color;
mod config;
mod geometry;
mod theme;

pub use color::{BlendMode, ColorStop, Rgb, Rgba};
pub use config::{
    DensityTier, EmitterConfig, FlowConfig, FlowMode, MAX_INTERVAL_MS, MAX_LUT_SIZE, MAX_PARTICLES,
    MAX_TRAIL_LENGTH,
};
pub use geometry::{CellMetrics, Size};
pub use theme::{GRID_COLOR, Theme};
