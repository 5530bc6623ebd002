//! The velocity field particles are steered by.
//!
//! Four contributions are summed into a target velocity:
//! a free stream shaped by a boundary-layer profile, the curl of a
//! two-scale noise potential, a swirl and push around the pointer, and an
//! oscillating wake downstream of the pointer.

use std::f32::consts::PI;

use glam::Vec2;
use slipstream_core::{FlowConfig, Size};

use crate::noise::NoiseField;
use crate::pointer::PointerState;

/// Step used for the finite-difference curl, in pixels.
const CURL_EPSILON: f32 = 2.0;
/// Below this distance from the pointer there is no usable direction.
const MIN_POINTER_DISTANCE: f32 = 1e-3;

/// Spatial frequency of the large-scale turbulence.
const LARGE_SCALE: f32 = 0.002;
/// How fast the noise pattern is carried downstream.
const ADVECTION: f32 = 0.8;

/// A frozen view of everything the velocity query reads during one frame.
#[derive(Debug, Clone, Copy)]
pub struct VelocityField<'a> {
    pub noise: &'a NoiseField,
    pub config: &'a FlowConfig,
    pub pointer: &'a PointerState,
    pub size: Size,
    pub time: f32,
}

impl VelocityField<'_> {
    /// Velocity a particle at `p` is pulled towards.
    pub fn target_velocity(&self, p: Vec2) -> Vec2 {
        let cfg = self.config;

        let n = self.potential(p);
        let d_dy = (self.potential(p + Vec2::new(0.0, CURL_EPSILON)) - n) / CURL_EPSILON;
        let d_dx = (self.potential(p + Vec2::new(CURL_EPSILON, 0.0)) - n) / CURL_EPSILON;

        let mut target = Vec2::new(
            self.free_stream(p.y) + d_dy * cfg.curl_gain,
            -d_dx * cfg.curl_gain,
        );

        target += self.pointer_perturbation(p);

        if let Some(intensity) = self.wake_intensity(p) {
            target.y += cfg.wake_deflection * cfg.base_velocity * intensity * self.shedding(p);
            target *= 1.0 - cfg.wake_slowdown.clamp(0.0, 1.0) * intensity;
        }

        target
    }

    /// Horizontal free-stream speed at height `y`: slowest near the top and
    /// bottom edges, fastest in between.
    pub fn free_stream(&self, y: f32) -> f32 {
        let height = self.size.height.max(1.0);
        let normalized = (y / height).clamp(0.0, 1.0);
        let profile = (normalized.powf(self.config.boundary_exponent) * PI).sin();
        self.config.base_velocity * (0.5 + 0.8 * profile)
    }

    /// Scalar stream function whose curl gives the turbulent part of the flow.
    fn potential(&self, p: Vec2) -> f32 {
        let t = self.time;
        let advected_x = p.x * LARGE_SCALE - t * ADVECTION;
        let scaled_y = p.y * LARGE_SCALE;

        let mut value = self.noise.sample(advected_x, scaled_y, t * 0.15) * 15.0;
        value += self.noise.sample(advected_x * 3.0, scaled_y * 3.0, t * 0.4) * 4.0;

        if let Some(intensity) = self.wake_intensity(p) {
            value += self.noise.sample(p.x * 0.015, p.y * 0.015, t * 2.5)
                * 8.0
                * intensity
                * (1.0 + self.shedding(p));
        }
        value
    }

    /// Swirl around the pointer, push away from it, and a share of its motion.
    fn pointer_perturbation(&self, p: Vec2) -> Vec2 {
        let cfg = self.config;
        let radius = cfg.influence_radius;
        let offset = p - self.pointer.position;
        let distance = offset.length();
        if !(distance < radius) || distance < MIN_POINTER_DISTANCE {
            return Vec2::ZERO;
        }

        let falloff = (1.0 - distance / radius).powf(cfg.falloff_exponent);
        let outward = offset / distance;
        let tangent = outward.perp();

        let swirl = tangent * cfg.swirl_strength;
        let push = outward * cfg.push_strength;
        let drag = self.pointer.velocity * cfg.pointer_drag;
        (swirl + push + drag) * falloff
    }

    /// How deep `p` sits inside the pointer's wake, 1 right behind it and 0
    /// at the far end. `None` outside the wake.
    fn wake_intensity(&self, p: Vec2) -> Option<f32> {
        let cfg = self.config;
        let dx = p.x - self.pointer.position.x;
        let dy = (p.y - self.pointer.position.y).abs();
        let inside = dx > 0.0
            && dx < cfg.wake_length
            && dy < cfg.wake_half_width + dx * cfg.wake_spread;
        inside.then(|| 1.0 - dx / cfg.wake_length)
    }

    /// Alternating sign pattern travelling downstream, like vortices shed
    /// off a cylinder.
    fn shedding(&self, p: Vec2) -> f32 {
        (p.x * 0.02 - self.time * 10.0).sin() * (p.y * 0.05).cos()
    }
}
