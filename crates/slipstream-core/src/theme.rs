//! The light/dark theme flag and its rendering constants.

use serde::{Deserialize, Serialize};

use crate::color::{BlendMode, Rgb, Rgba};

/// Color of the faint grid overlay, in both themes.
pub const GRID_COLOR: Rgb = Rgb::new(148, 163, 184);

/// Light or dark presentation.
///
/// The theme only selects colors and compositing; particle physics is the
/// same under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Switch to the other theme.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Opaque page background.
    pub fn background(self) -> Rgb {
        match self {
            Theme::Dark => Rgb::new(5, 8, 16),
            Theme::Light => Rgb::new(248, 250, 252),
        }
    }

    /// Translucent fill laid over the previous frame, so old trails fade
    /// out instead of vanishing.
    pub fn fade(self) -> Rgba {
        match self {
            Theme::Dark => self.background().with_alpha(0.28),
            Theme::Light => self.background().with_alpha(0.45),
        }
    }

    /// Grid overlay color.
    pub fn grid(self) -> Rgba {
        match self {
            Theme::Dark => GRID_COLOR.with_alpha(0.02),
            Theme::Light => GRID_COLOR.with_alpha(0.05),
        }
    }

    /// Compositing used for particle strokes.
    pub fn stroke_blend(self) -> BlendMode {
        match self {
            Theme::Dark => BlendMode::Screen,
            Theme::Light => BlendMode::Multiply,
        }
    }

    /// Scale applied to a stroke's life-cycle alpha.
    pub fn max_opacity(self) -> f32 {
        match self {
            Theme::Dark => 0.30,
            Theme::Light => 0.25,
        }
    }

    /// Alpha added after scaling, keeping light-mode strokes faintly visible
    /// while they fade in and out.
    pub fn opacity_floor(self) -> f32 {
        match self {
            Theme::Dark => 0.0,
            Theme::Light => 0.02,
        }
    }
}
