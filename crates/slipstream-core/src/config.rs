//! Tunables of the flow-field animation.
//!
//! The values were tuned by eye, not derived. Treat the defaults as the
//! look to preserve. Lengths are logical pixels, speeds are logical pixels
//! per frame and durations are frames unless a field name says otherwise.

use serde::{Deserialize, Serialize};

use crate::color::{ColorStop, Rgb};

/// Upper bound on any particle pool, whatever the config asks for.
pub const MAX_PARTICLES: usize = 20_000;
/// Upper bound on points kept per trail.
pub const MAX_TRAIL_LENGTH: usize = 256;
/// Upper bound on color lookup table buckets.
pub const MAX_LUT_SIZE: usize = 4096;
/// Upper bound on the frame interval and resize quiet period, in milliseconds.
pub const MAX_INTERVAL_MS: u64 = 10_000;

/// Which animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    /// A left-to-right stream through a noise field, disturbed by the pointer.
    #[default]
    Stream,
    /// Particles born at the pointer and flung outward.
    Emitter,
}

/// Particle budget for viewports up to `max_area` square pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityTier {
    pub max_area: f32,
    pub particles: usize,
}

/// Every knob of the flow-field animator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Stream or pointer emitter.
    pub mode: FlowMode,
    /// Particle count for viewports larger than every density tier.
    pub particle_count: usize,
    /// Smaller viewports get fewer particles. Checked in order, first match wins.
    pub density_tiers: Vec<DensityTier>,
    /// Maximum number of points kept per trail.
    pub trail_length: usize,
    /// Noise time advanced per frame.
    pub time_step: f32,
    /// Target delay between frames, in milliseconds.
    pub frame_interval_ms: u64,
    /// Quiet period before a burst of resize events is applied, in milliseconds.
    pub resize_debounce_ms: u64,

    /// Free-stream horizontal speed.
    pub base_velocity: f32,
    /// Exponent applied to the normalized height inside the boundary-layer sine.
    pub boundary_exponent: f32,
    /// Gain on the curl of the noise potential.
    pub curl_gain: f32,
    /// Fraction of the gap to the target velocity closed each frame.
    pub lag_factor: f32,
    /// Amplitude of the per-frame random velocity jitter.
    pub jitter: f32,

    /// Radius around the pointer that perturbs the flow.
    pub influence_radius: f32,
    /// Tangential (swirl) strength at the pointer.
    pub swirl_strength: f32,
    /// Radial (push-away) strength at the pointer.
    ///
    /// Part of the target velocity, so it reaches the particle through the
    /// lag blend. At steady state a particle is pushed by this much per
    /// frame; the default equals a direct kick of 2.0 divided by the default
    /// `lag_factor`.
    pub push_strength: f32,
    /// Share of the pointer's own velocity passed on to nearby particles.
    pub pointer_drag: f32,
    /// Exponent of the `(1 - d / radius)` falloff.
    pub falloff_exponent: f32,
    /// Per-frame decay of the remembered pointer velocity.
    pub pointer_velocity_decay: f32,

    /// Length of the wake region downstream of the pointer.
    pub wake_length: f32,
    /// Half height of the wake right behind the pointer.
    pub wake_half_width: f32,
    /// How fast the wake widens per pixel downstream.
    pub wake_spread: f32,
    /// Lateral shedding deflection, as a multiple of `base_velocity`.
    pub wake_deflection: f32,
    /// Speed reduction right behind the pointer (0 = none, 1 = full stop).
    pub wake_slowdown: f32,

    /// Share of particles that start off-screen to the left.
    pub offscreen_fraction: f32,
    /// Chance that a respawn lands anywhere instead of the upstream edge.
    pub reseed_anywhere_chance: f32,
    /// How far left of the viewport new particles may enter.
    pub spawn_depth: f32,
    /// Margin past the right edge before a particle is recycled.
    pub exit_margin_x: f32,
    /// Margin past the top and bottom edges before a particle is recycled.
    pub exit_margin_y: f32,
    /// Shortest lifespan.
    pub lifespan_min: f32,
    /// Random extra lifespan on top of `lifespan_min`.
    pub lifespan_span: f32,
    /// Upper bound of the random starting age of the first generation.
    pub initial_age_max: f32,

    /// Frames to fade a stroke in.
    pub fade_in_frames: f32,
    /// Frames to fade a stroke out before its lifespan ends.
    pub fade_out_frames: f32,
    /// Number of buckets in each color lookup table.
    pub lut_size: usize,
    /// Speed mapped to the first LUT entry.
    pub speed_floor: f32,
    /// Speed range mapped across the LUT.
    pub speed_span: f32,
    /// Stroke width of the fastest particles.
    pub line_width_min: f32,
    /// Stroke width of the slowest particles.
    pub line_width_max: f32,

    /// Draw the faint grid overlay.
    pub grid: bool,
    pub grid_spacing_x: f32,
    pub grid_spacing_y: f32,

    /// Speed gradient used on dark backgrounds.
    pub dark_stops: Vec<ColorStop>,
    /// Speed gradient used on light backgrounds.
    pub light_stops: Vec<ColorStop>,

    /// Tuning of [`FlowMode::Emitter`].
    pub emitter: EmitterConfig,
}

/// Tunables of the pointer emitter.
///
/// Forces fall off as `exp(-d² / scale)` around the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Particles born per frame.
    pub emit_per_frame: usize,
    /// Pool cap. The oldest particle makes room for a new one.
    pub max_particles: usize,
    /// Viewports at most this wide use the compact budget below.
    pub compact_width: f32,
    pub compact_emit_per_frame: usize,
    pub compact_max_particles: usize,
    /// Birth positions scatter up to this far from the pointer on each axis.
    pub spread: f32,
    /// Share of the pointer velocity a particle is born with.
    pub velocity_share: f32,
    pub lifespan_min: f32,
    pub lifespan_span: f32,
    pub radial_strength: f32,
    pub radial_scale: f32,
    pub swirl_strength: f32,
    pub swirl_scale: f32,
    /// Share of the pointer velocity added every frame.
    pub pointer_drag: f32,
    /// Velocity kept per frame.
    pub damping: f32,
    /// Distance moved per frame, as a multiple of velocity.
    pub step_scale: f32,
    /// Alpha of the per-frame fade towards the background.
    pub fade_alpha: f32,
    pub stroke_alpha: f32,
    pub line_width: f32,
    pub dark_color: Rgb,
    pub light_color: Rgb,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            emit_per_frame: 12,
            max_particles: 1600,
            compact_width: 900.0,
            compact_emit_per_frame: 4,
            compact_max_particles: 800,
            spread: 4.0,
            velocity_share: 0.10,
            lifespan_min: 120.0,
            lifespan_span: 160.0,
            radial_strength: 1.6,
            radial_scale: 9000.0,
            swirl_strength: 0.9,
            swirl_scale: 16000.0,
            pointer_drag: 0.002,
            damping: 0.985,
            step_scale: 2.0,
            fade_alpha: 0.06,
            stroke_alpha: 0.08,
            line_width: 1.0,
            dark_color: Rgb::new(170, 200, 255),
            light_color: Rgb::new(30, 64, 175),
        }
    }
}

impl EmitterConfig {
    /// Births per frame and pool cap for a viewport `width` pixels wide.
    pub fn budget(&self, width: f32) -> (usize, usize) {
        let (emit, max) = if width <= self.compact_width {
            (self.compact_emit_per_frame, self.compact_max_particles)
        } else {
            (self.emit_per_frame, self.max_particles)
        };
        (emit.min(MAX_PARTICLES), max.min(MAX_PARTICLES))
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            mode: FlowMode::Stream,
            particle_count: 1200,
            density_tiers: vec![
                DensityTier {
                    max_area: 600_000.0,
                    particles: 500,
                },
                DensityTier {
                    max_area: 1_500_000.0,
                    particles: 900,
                },
            ],
            trail_length: 16,
            time_step: 0.002,
            frame_interval_ms: 33,
            resize_debounce_ms: 100,

            base_velocity: 1.8,
            boundary_exponent: 0.8,
            curl_gain: 1.5,
            lag_factor: 0.15,
            jitter: 0.05,

            influence_radius: 150.0,
            swirl_strength: 1.2,
            push_strength: 13.3,
            pointer_drag: 0.05,
            falloff_exponent: 3.0,
            pointer_velocity_decay: 0.9,

            wake_length: 500.0,
            wake_half_width: 100.0,
            wake_spread: 0.25,
            wake_deflection: 0.6,
            wake_slowdown: 0.35,

            offscreen_fraction: 0.1,
            reseed_anywhere_chance: 0.02,
            spawn_depth: 100.0,
            exit_margin_x: 100.0,
            exit_margin_y: 50.0,
            lifespan_min: 400.0,
            lifespan_span: 400.0,
            initial_age_max: 200.0,

            fade_in_frames: 20.0,
            fade_out_frames: 60.0,
            lut_size: 200,
            speed_floor: 0.5,
            speed_span: 3.5,
            line_width_min: 0.8,
            line_width_max: 1.8,

            grid: true,
            grid_spacing_x: 120.0,
            grid_spacing_y: 80.0,

            dark_stops: vec![
                ColorStop::new(0.0, 40, 5, 5),
                ColorStop::new(0.15, 220, 20, 20),
                ColorStop::new(0.3, 255, 140, 0),
                ColorStop::new(0.45, 255, 215, 0),
                ColorStop::new(0.6, 50, 205, 50),
                ColorStop::new(0.75, 0, 191, 255),
                ColorStop::new(0.9, 30, 60, 255),
                ColorStop::new(1.0, 138, 43, 226),
            ],
            light_stops: vec![
                ColorStop::new(0.0, 255, 235, 235),
                ColorStop::new(0.15, 239, 68, 68),
                ColorStop::new(0.3, 249, 115, 22),
                ColorStop::new(0.45, 234, 179, 8),
                ColorStop::new(0.6, 34, 197, 94),
                ColorStop::new(0.75, 6, 182, 212),
                ColorStop::new(0.9, 59, 130, 246),
                ColorStop::new(1.0, 168, 85, 247),
            ],

            emitter: EmitterConfig::default(),
        }
    }
}

impl FlowConfig {
    /// Particle budget for a viewport of `area` square pixels, never above
    /// [`MAX_PARTICLES`].
    pub fn particles_for_area(&self, area: f32) -> usize {
        self.density_tiers
            .iter()
            .find(|tier| area <= tier.max_area)
            .map_or(self.particle_count, |tier| tier.particles)
            .min(MAX_PARTICLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_for_area() {
        let config = FlowConfig::default();
        assert_eq!(config.particles_for_area(0.0), 500);
        assert_eq!(config.particles_for_area(600_000.0), 500);
        assert_eq!(config.particles_for_area(1_000_000.0), 900);
        assert_eq!(config.particles_for_area(4_000_000.0), 1200);
    }

    #[test]
    fn test_no_tiers_uses_particle_count() {
        let config = FlowConfig {
            density_tiers: Vec::new(),
            particle_count: 42,
            ..Default::default()
        };
        assert_eq!(config.particles_for_area(10.0), 42);
    }

    #[test]
    fn test_particle_budget_is_capped() {
        let config = FlowConfig {
            density_tiers: Vec::new(),
            particle_count: usize::MAX,
            ..Default::default()
        };
        assert_eq!(config.particles_for_area(10.0), MAX_PARTICLES);
    }

    #[test]
    fn test_emitter_budget_by_width() {
        let emitter = EmitterConfig::default();
        assert_eq!(emitter.budget(800.0), (4, 800));
        assert_eq!(emitter.budget(1600.0), (12, 1600));
        let greedy = EmitterConfig {
            max_particles: usize::MAX,
            ..Default::default()
        };
        assert_eq!(greedy.budget(1600.0).1, MAX_PARTICLES);
    }

    #[test]
    fn test_mode_from_toml() {
        let config: FlowConfig = toml::from_str("mode = \"emitter\"\n").unwrap();
        assert_eq!(config.mode, FlowMode::Emitter);
        assert_eq!(FlowConfig::default().mode, FlowMode::Stream);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FlowConfig = toml::from_str("trail_length = 8\ngrid = false\n").unwrap();
        assert_eq!(config.trail_length, 8);
        assert!(!config.grid);
        assert_eq!(config.particle_count, FlowConfig::default().particle_count);
        assert_eq!(config.dark_stops.len(), 8);
    }
}
