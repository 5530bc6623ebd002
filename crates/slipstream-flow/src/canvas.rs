//! Software raster surface shown in the terminal with half-block cells.
//!
//! Every terminal cell holds two vertically stacked pixels: the upper one
//! is drawn as the foreground of `▀` and the lower one as its background.

use glam::Vec2;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use slipstream_core::{BlendMode, CellMetrics, Rgb, Rgba, Size};

use crate::surface::{Path, Region, Surface};

/// Chords per quadratic segment when flattening strokes.
const CURVE_STEPS: usize = 4;

/// A linear-RGB pixel buffer sized in terminal cells, addressed in logical
/// pixels.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    size: Size,
    cell: CellMetrics,
    columns: u16,
    rows: u16,
    pixels: Vec<[f32; 3]>,
    blend: BlendMode,
}

impl PixelCanvas {
    pub fn new(size: Size, cell: CellMetrics) -> Self {
        let mut canvas = Self {
            size: Size::default(),
            cell,
            columns: 0,
            rows: 0,
            pixels: Vec::new(),
            blend: BlendMode::Normal,
        };
        canvas.resize(size);
        canvas
    }

    /// Raster dimensions: pixel columns and pixel rows.
    pub fn raster_size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    /// Color of a raster pixel.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        self.index(x as i64, y as i64).map(|i| to_rgb(self.pixels[i]))
    }

    /// Logical pixels per raster pixel on each axis.
    fn scale(&self) -> Vec2 {
        Vec2::new(
            self.cell.width.max(f32::EPSILON),
            (self.cell.height / 2.0).max(f32::EPSILON),
        )
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let inside = (0..self.columns as i64).contains(&x) && (0..self.rows as i64).contains(&y);
        inside.then(|| y as usize * self.columns as usize + x as usize)
    }

    fn blend_pixel(&mut self, index: usize, color: [f32; 3], alpha: f32) {
        let mode = self.blend;
        let dst = &mut self.pixels[index];
        for (d, s) in dst.iter_mut().zip(color) {
            let mixed = match mode {
                BlendMode::Normal => s,
                BlendMode::Screen => 1.0 - (1.0 - s) * (1.0 - *d),
                BlendMode::Multiply => s * *d,
            };
            *d += (mixed - *d) * alpha;
        }
    }

    /// Blend one straight run of pixels from `a` to `b` (raster coordinates),
    /// skipping the start pixel when it was already painted by the previous
    /// run of the same stroke.
    fn plot_line(
        &mut self,
        a: Vec2,
        b: Vec2,
        color: [f32; 3],
        alpha: f32,
        last: &mut Option<usize>,
    ) {
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = a + delta * (i as f32 / steps as f32);
            let Some(index) = self.index(p.x.floor() as i64, p.y.floor() as i64) else {
                continue;
            };
            if *last == Some(index) {
                continue;
            }
            *last = Some(index);
            self.blend_pixel(index, color, alpha);
        }
    }
}

impl Surface for PixelCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        let (columns, cell_rows) = self.cell.cells_for(size);
        self.size = size;
        self.columns = columns;
        self.rows = cell_rows.saturating_mul(2);
        self.pixels = vec![[0.0; 3]; columns as usize * self.rows as usize];
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill_rect(&mut self, region: Region, color: Rgba) {
        let scale = self.scale();
        let x0 = (region.x / scale.x).floor();
        let y0 = (region.y / scale.y).floor();
        let x1 = ((region.x + region.width) / scale.x).ceil();
        let y1 = ((region.y + region.height) / scale.y).ceil();
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return;
        }
        let x0 = x0.clamp(0.0, self.columns as f32) as usize;
        let x1 = x1.clamp(0.0, self.columns as f32) as usize;
        let y0 = y0.clamp(0.0, self.rows as f32) as usize;
        let y1 = y1.clamp(0.0, self.rows as f32) as usize;

        let src = to_linear(color.rgb);
        let alpha = color.alpha.clamp(0.0, 1.0);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(y * self.columns as usize + x, src, alpha);
            }
        }
    }

    /// Raster pixels are far larger than the stroke widths in use, so width
    /// acts as coverage: a half-pixel line paints at half strength.
    fn stroke(&mut self, path: &Path, color: Rgba, width: f32) {
        let alpha = (color.alpha * width.clamp(0.0, 1.0)).clamp(0.0, 1.0);
        if !(alpha > 0.0) {
            return;
        }
        let src = to_linear(color.rgb);
        let scale = self.scale();
        let mut last = None;
        for line in path.flatten(CURVE_STEPS) {
            let points: Vec<Vec2> = line.iter().map(|&p| p / scale).collect();
            if !points.iter().all(|p| p.is_finite()) {
                continue;
            }
            for pair in points.windows(2) {
                self.plot_line(pair[0], pair[1], src, alpha, &mut last);
            }
        }
    }
}

impl Widget for &PixelCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = area.width.min(self.columns);
        let cell_rows = area.height.min(self.rows / 2);
        for row in 0..cell_rows {
            for col in 0..columns {
                let top = self.pixel(col, row * 2).unwrap_or(Rgb::BLACK);
                let bottom = self.pixel(col, row * 2 + 1).unwrap_or(Rgb::BLACK);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀').set_fg(top.into()).set_bg(bottom.into());
                }
            }
        }
    }
}

fn to_linear(c: Rgb) -> [f32; 3] {
    [c.r, c.g, c.b].map(|v| v as f32 / 255.0)
}

fn to_rgb(p: [f32; 3]) -> Rgb {
    let [r, g, b] = p.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
    Rgb::new(r, g, b)
}
