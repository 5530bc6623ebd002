//! Sizes and terminal cell metrics.

use serde::{Deserialize, Serialize};

/// A viewport or surface size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Whether there is anything to draw on.
    pub fn is_empty(&self) -> bool {
        !(self.width >= 1.0 && self.height >= 1.0)
    }
}

/// How many logical pixels one terminal cell stands for.
///
/// All pixel-denominated tuning in [`crate::FlowConfig`] is expressed in
/// logical pixels, so the cell metrics play the role of a device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

impl CellMetrics {
    /// Logical size of a `cols` x `rows` cell grid.
    pub fn logical_size(&self, cols: u16, rows: u16) -> Size {
        Size::new(cols as f32 * self.width, rows as f32 * self.height)
    }

    /// Logical position of the centre of cell (`col`, `row`).
    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.width,
            (row as f32 + 0.5) * self.height,
        )
    }

    /// Number of whole cells covering `size`.
    pub fn cells_for(&self, size: Size) -> (u16, u16) {
        let cols = (size.width / self.width.max(f32::EPSILON)).round();
        let rows = (size.height / self.height.max(f32::EPSILON)).round();
        (
            cols.clamp(0.0, u16::MAX as f32) as u16,
            rows.clamp(0.0, u16::MAX as f32) as u16,
        )
    }
}
