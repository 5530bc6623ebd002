//! Speed-to-color lookup tables.

use slipstream_core::{ColorStop, FlowConfig, MAX_LUT_SIZE, Rgb, Theme};

/// A gradient sampled into `size + 1` buckets covering `t = 0..=1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorLut {
    table: Vec<Rgb>,
}

impl ColorLut {
    /// Sample `stops` into a table of `size` steps, at most [`MAX_LUT_SIZE`].
    ///
    /// Stops are expected in strictly increasing `t` from 0 to 1; the config
    /// loader enforces that. With no stops the table is black, and a single
    /// stop yields a constant table.
    pub fn build(stops: &[ColorStop], size: usize) -> Self {
        let size = size.clamp(1, MAX_LUT_SIZE);
        let table = (0..=size)
            .map(|i| sample_stops(stops, i as f32 / size as f32))
            .collect();
        Self { table }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Color for a normalized speed. Out-of-range and non-finite inputs are
    /// clamped onto the table.
    pub fn lookup(&self, t: f32) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.table.len().saturating_sub(1);
        let index = ((t * last as f32) as usize).min(last);
        self.table.get(index).copied().unwrap_or(Rgb::BLACK)
    }
}

/// The dark and light tables, built once per animator.
#[derive(Debug, Clone)]
pub struct LutPair {
    pub dark: ColorLut,
    pub light: ColorLut,
}

impl LutPair {
    pub fn from_config(config: &FlowConfig) -> Self {
        Self {
            dark: ColorLut::build(&config.dark_stops, config.lut_size),
            light: ColorLut::build(&config.light_stops, config.lut_size),
        }
    }

    pub fn for_theme(&self, theme: Theme) -> &ColorLut {
        match theme {
            Theme::Dark => &self.dark,
            Theme::Light => &self.light,
        }
    }
}

fn sample_stops(stops: &[ColorStop], t: f32) -> Rgb {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Rgb::BLACK;
    };
    let (start, end) = stops
        .windows(2)
        .find(|pair| t >= pair[0].t && t <= pair[1].t)
        .map_or((first, last), |pair| (&pair[0], &pair[1]));

    let range = end.t - start.t;
    if range <= 0.0 {
        return end.color();
    }
    let eased = ease_in_out_cubic(((t - start.t) / range).clamp(0.0, 1.0));
    Rgb::new(
        mix(start.r, end.r, eased),
        mix(start.g, end.g, eased),
        mix(start.b, end.b, eased),
    )
}

fn mix(a: u8, b: u8, t: f32) -> u8 {
    let v = a as f32 + (b as f32 - a as f32) * t;
    v.floor().clamp(0.0, 255.0) as u8
}

/// Cubic ease-in-out: slow at both ends of every segment.
fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
