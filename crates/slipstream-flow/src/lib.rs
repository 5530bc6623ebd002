//! Particle flow-field backdrop.
//!
//! Particles ride a velocity field built from a boundary-layer free stream,
//! the curl of simplex noise, and a swirl and wake around the pointer.
//! Each frame fades the previous one and strokes every particle's trail in
//! a speed-dependent color. An alternative emitter mode births particles at
//! the pointer instead.
//!
//! [`create`] mounts an animator on a [`Host`], [`AnimatorHandle::tick`]
//! runs the frame callback, and [`stop`] tears it down.
//! [`PixelCanvas`] is a software [`Surface`] that renders into a ratatui
//! buffer.

mod animator;
mod canvas;
mod debounce;
mod emitter;
mod field;
mod lut;
mod noise;
mod particle;
mod pointer;
mod render;
mod simulation;
mod state;
mod surface;
mod theme;

#[cfg(test)]
mod testing;

pub use animator::{AnimatorHandle, CancelToken, Host, create, create_with_rng, stop};
pub use canvas::PixelCanvas;
pub use debounce::Debouncer;
pub use emitter::{EmitterState, Spark};
pub use field::VelocityField;
pub use lut::{ColorLut, LutPair};
pub use noise::NoiseField;
pub use particle::{Particle, Trail};
pub use pointer::PointerState;
pub use render::{line_width, normalized_speed, stroke_alpha};
pub use simulation::Simulation;
pub use state::FlowState;
pub use surface::{Path, PathSegment, Region, Surface};
pub use theme::{ThemeReader, ThemeSignal};
