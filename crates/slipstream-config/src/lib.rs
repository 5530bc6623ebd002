//! Configuration file handling for slipstream.
//!
//! The config lives at `<config dir>/slipstream/config.toml`. Every key is
//! optional; missing keys take their defaults.

use std::fmt::Debug;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use slipstream_core::{
    CellMetrics, ColorStop, FlowConfig, MAX_INTERVAL_MS, MAX_LUT_SIZE, MAX_PARTICLES,
    MAX_TRAIL_LENGTH, Theme,
};
use tracing::debug;

const APP_NAME: &str = "slipstream";
const CONFIG_FILE: &str = "config.toml";

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Light or dark backdrop.
    pub theme: Theme,
    /// Paint a still backdrop instead of animating.
    pub reduced_motion: bool,
    /// Heading drawn over the backdrop.
    pub title: String,
    /// Logical pixels per terminal cell.
    pub cell: CellMetrics,
    /// Animation tuning.
    pub flow: FlowConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            reduced_motion: false,
            title: APP_NAME.to_string(),
            cell: CellMetrics::default(),
            flow: FlowConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| eyre!("no home directory found"))?;
        Self::load_from(&path)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config = Self::parse(&text)
            .wrap_err_with(|| format!("invalid config {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).wrap_err("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = config_path().ok_or_else(|| eyre!("no home directory found"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("failed to create {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).wrap_err("failed to serialize config")?;
        fs::write(path, text).wrap_err_with(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Reject values the animation cannot work with: malformed gradients,
    /// counts past the engine's caps and floats that are not finite or
    /// outside their useful range.
    pub fn validate(&self) -> Result<()> {
        let flow = &self.flow;
        let emitter = &flow.emitter;
        validate_stops("dark_stops", &flow.dark_stops)?;
        validate_stops("light_stops", &flow.light_stops)?;

        count("flow.trail_length", flow.trail_length, 2..=MAX_TRAIL_LENGTH)?;
        count("flow.lut_size", flow.lut_size, 1..=MAX_LUT_SIZE)?;
        count("flow.particle_count", flow.particle_count, 0..=MAX_PARTICLES)?;
        for tier in &flow.density_tiers {
            count("flow.density_tiers.particles", tier.particles, 0..=MAX_PARTICLES)?;
            non_negative("flow.density_tiers.max_area", tier.max_area)?;
        }
        count("flow.frame_interval_ms", flow.frame_interval_ms, 1..=MAX_INTERVAL_MS)?;
        count("flow.resize_debounce_ms", flow.resize_debounce_ms, 1..=MAX_INTERVAL_MS)?;
        count("flow.emitter.emit_per_frame", emitter.emit_per_frame, 0..=MAX_PARTICLES)?;
        count("flow.emitter.max_particles", emitter.max_particles, 0..=MAX_PARTICLES)?;
        count(
            "flow.emitter.compact_emit_per_frame",
            emitter.compact_emit_per_frame,
            0..=MAX_PARTICLES,
        )?;
        count(
            "flow.emitter.compact_max_particles",
            emitter.compact_max_particles,
            0..=MAX_PARTICLES,
        )?;

        // Signed strengths: a negative value reverses the force.
        for (name, value) in [
            ("flow.curl_gain", flow.curl_gain),
            ("flow.swirl_strength", flow.swirl_strength),
            ("flow.push_strength", flow.push_strength),
            ("flow.pointer_drag", flow.pointer_drag),
            ("flow.wake_deflection", flow.wake_deflection),
            ("flow.speed_floor", flow.speed_floor),
            ("flow.emitter.velocity_share", emitter.velocity_share),
            ("flow.emitter.radial_strength", emitter.radial_strength),
            ("flow.emitter.swirl_strength", emitter.swirl_strength),
            ("flow.emitter.pointer_drag", emitter.pointer_drag),
        ] {
            finite(name, value)?;
        }
        for (name, value) in [
            ("flow.time_step", flow.time_step),
            ("flow.jitter", flow.jitter),
            ("flow.wake_half_width", flow.wake_half_width),
            ("flow.wake_spread", flow.wake_spread),
            ("flow.spawn_depth", flow.spawn_depth),
            ("flow.exit_margin_x", flow.exit_margin_x),
            ("flow.exit_margin_y", flow.exit_margin_y),
            ("flow.lifespan_span", flow.lifespan_span),
            ("flow.initial_age_max", flow.initial_age_max),
            ("flow.fade_in_frames", flow.fade_in_frames),
            ("flow.fade_out_frames", flow.fade_out_frames),
            ("flow.grid_spacing_x", flow.grid_spacing_x),
            ("flow.grid_spacing_y", flow.grid_spacing_y),
            ("flow.emitter.compact_width", emitter.compact_width),
            ("flow.emitter.spread", emitter.spread),
            ("flow.emitter.lifespan_span", emitter.lifespan_span),
        ] {
            non_negative(name, value)?;
        }
        for (name, value) in [
            ("flow.base_velocity", flow.base_velocity),
            ("flow.boundary_exponent", flow.boundary_exponent),
            ("flow.influence_radius", flow.influence_radius),
            ("flow.falloff_exponent", flow.falloff_exponent),
            ("flow.wake_length", flow.wake_length),
            ("flow.lifespan_min", flow.lifespan_min),
            ("flow.speed_span", flow.speed_span),
            ("flow.line_width_min", flow.line_width_min),
            ("flow.line_width_max", flow.line_width_max),
            ("flow.emitter.lifespan_min", emitter.lifespan_min),
            ("flow.emitter.radial_scale", emitter.radial_scale),
            ("flow.emitter.swirl_scale", emitter.swirl_scale),
            ("flow.emitter.step_scale", emitter.step_scale),
            ("flow.emitter.line_width", emitter.line_width),
            ("cell.width", self.cell.width),
            ("cell.height", self.cell.height),
        ] {
            positive(name, value)?;
        }
        for (name, value) in [
            ("flow.pointer_velocity_decay", flow.pointer_velocity_decay),
            ("flow.wake_slowdown", flow.wake_slowdown),
            ("flow.offscreen_fraction", flow.offscreen_fraction),
            ("flow.reseed_anywhere_chance", flow.reseed_anywhere_chance),
            ("flow.emitter.damping", emitter.damping),
            ("flow.emitter.fade_alpha", emitter.fade_alpha),
            ("flow.emitter.stroke_alpha", emitter.stroke_alpha),
        ] {
            unit(name, value)?;
        }

        if !(flow.lag_factor > 0.0 && flow.lag_factor <= 1.0) {
            bail!("flow.lag_factor must be in (0, 1], got {}", flow.lag_factor);
        }
        if flow.line_width_min > flow.line_width_max {
            bail!("flow.line_width_min must not exceed flow.line_width_max");
        }
        Ok(())
    }
}

fn validate_stops(name: &str, stops: &[ColorStop]) -> Result<()> {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        bail!("flow.{name} must not be empty");
    };
    if first.t != 0.0 || last.t != 1.0 {
        bail!("flow.{name} must start at t = 0 and end at t = 1");
    }
    if stops.windows(2).any(|pair| !(pair[0].t < pair[1].t)) {
        bail!("flow.{name} must have strictly increasing t");
    }
    Ok(())
}

fn count<T: PartialOrd + Debug>(name: &str, value: T, range: RangeInclusive<T>) -> Result<()> {
    if !range.contains(&value) {
        bail!("{name} must be in {range:?}, got {value:?}");
    }
    Ok(())
}

fn finite(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() {
        bail!("{name} must be a finite number, got {value}");
    }
    Ok(())
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if !(value.is_finite() && value >= 0.0) {
        bail!("{name} must be a finite number >= 0, got {value}");
    }
    Ok(())
}

fn positive(name: &str, value: f32) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        bail!("{name} must be a finite number > 0, got {value}");
    }
    Ok(())
}

fn unit(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        bail!("{name} must be in [0, 1], got {value}");
    }
    Ok(())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Path of the config file.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Directory for logs and other local state.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
}
