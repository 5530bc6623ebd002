//! Color records.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha value.
    pub const fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba { rgb: self, alpha }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// An RGB color with a straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

/// A color stop of a gradient: `t` in `0.0..=1.0` and the color at that position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub t: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorStop {
    pub const fn new(t: f32, r: u8, g: u8, b: u8) -> Self {
        Self { t, r, g, b }
    }

    pub const fn color(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// How drawn pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Plain alpha compositing.
    #[default]
    Normal,
    /// Additive-like: brightens, never darkens.
    Screen,
    /// Subtractive-like: darkens, never brightens.
    Multiply,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_into_ratatui_color() {
        let color: Color = Rgb::new(5, 8, 16).into();
        assert_eq!(color, Color::Rgb(5, 8, 16));
    }

    #[test]
    fn test_color_stop_color() {
        let stop = ColorStop::new(0.5, 1, 2, 3);
        assert_eq!(stop.color(), Rgb::new(1, 2, 3));
    }
}
