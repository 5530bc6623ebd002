//! Drawing one frame of the flow onto a [`Surface`].

use slipstream_core::{BlendMode, FlowConfig, Rgba, Theme};

use crate::lut::ColorLut;
use crate::particle::Particle;
use crate::surface::{Path, Region, Surface};

/// Map a speed onto `[0, 1]` for the color table and stroke width.
pub fn normalized_speed(speed: f32, config: &FlowConfig) -> f32 {
    let t = (speed - config.speed_floor) / config.speed_span.max(f32::EPSILON);
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Stroke opacity over a particle's life: ramps in after spawn, out before
/// its lifespan ends, then scaled for the theme. Always within `[0, 1]`.
pub fn stroke_alpha(age: f32, lifespan: f32, theme: Theme, config: &FlowConfig) -> f32 {
    let fade_in = ramp(age, config.fade_in_frames);
    let fade_out = ramp(lifespan - age, config.fade_out_frames);
    let alpha = fade_in.min(fade_out) * theme.max_opacity() + theme.opacity_floor();
    if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) }
}

/// Faster particles draw thinner.
pub fn line_width(normalized_speed: f32, config: &FlowConfig) -> f32 {
    let (min, max) = (
        config.line_width_min.min(config.line_width_max),
        config.line_width_max.max(config.line_width_min),
    );
    (max - normalized_speed * (max - min)).clamp(min, max)
}

fn ramp(frames: f32, duration: f32) -> f32 {
    let v = frames / duration.max(f32::EPSILON);
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Fade the previous frame towards the background and lay the grid over it.
pub fn draw_backdrop<S: Surface + ?Sized>(surface: &mut S, theme: Theme, config: &FlowConfig) {
    let size = surface.size();
    surface.set_blend(BlendMode::Normal);
    surface.fill_rect(Region::covering(size), theme.fade());

    if !config.grid {
        return;
    }
    let grid = theme.grid();
    if config.grid_spacing_x >= 1.0 {
        let mut x = 0.0;
        while x < size.width {
            surface.fill_rect(Region::new(x, 0.0, 1.0, size.height), grid);
            x += config.grid_spacing_x;
        }
    }
    if config.grid_spacing_y >= 1.0 {
        let mut y = 0.0;
        while y < size.height {
            surface.fill_rect(Region::new(0.0, y, size.width, 1.0), grid);
            y += config.grid_spacing_y;
        }
    }
}

/// Stroke every particle trail, then restore normal compositing so the
/// next backdrop fill is unaffected.
pub fn draw_particles<S: Surface + ?Sized>(
    surface: &mut S,
    particles: &[Particle],
    lut: &ColorLut,
    theme: Theme,
    config: &FlowConfig,
) {
    surface.set_blend(theme.stroke_blend());
    let mut path = Path::new();
    for particle in particles {
        if particle.trail().len() < 2 {
            continue;
        }
        let t = normalized_speed(particle.speed(), config);
        let color = Rgba {
            rgb: lut.lookup(t),
            alpha: stroke_alpha(particle.age, particle.lifespan, theme, config),
        };
        path.set_smoothed(particle.trail().iter());
        surface.stroke(&path, color, line_width(t, config));
    }
    surface.set_blend(BlendMode::Normal);
}
