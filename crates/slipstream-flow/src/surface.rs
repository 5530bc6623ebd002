//! The drawing surface the animator paints on.

use glam::Vec2;
use slipstream_core::{BlendMode, Rgba, Size};

/// An axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a surface of `size`.
    pub const fn covering(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { control: Vec2, to: Vec2 },
}

/// A stroke outline made of straight and quadratic segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.segments.push(PathSegment::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Vec2) {
        self.segments.push(PathSegment::LineTo(p));
    }

    pub fn quad_to(&mut self, control: Vec2, to: Vec2) {
        self.segments.push(PathSegment::QuadTo { control, to });
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Replace the contents with a smooth curve through `points`: each
    /// interior point becomes the control of a quadratic ending halfway to
    /// the next point, and a final line reaches the last point.
    pub fn set_smoothed(&mut self, points: impl IntoIterator<Item = Vec2>) {
        self.clear();
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return;
        };
        self.move_to(first);
        let Some(mut previous) = points.next() else {
            return;
        };
        for next in points {
            self.quad_to(previous, (previous + next) * 0.5);
            previous = next;
        }
        self.line_to(previous);
    }

    /// Approximate the outline with straight polylines, one per sub-path.
    /// Each quadratic is split into `steps` chords.
    pub fn flatten(&self, steps: usize) -> Vec<Vec<Vec2>> {
        let steps = steps.max(1);
        let mut lines: Vec<Vec<Vec2>> = Vec::new();
        let mut pen: Option<Vec2> = None;
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) => {
                    lines.push(vec![p]);
                    pen = Some(p);
                }
                PathSegment::LineTo(p) => {
                    current(&mut lines, pen).push(p);
                    pen = Some(p);
                }
                PathSegment::QuadTo { control, to } => {
                    let from = pen.unwrap_or(control);
                    let line = current(&mut lines, pen);
                    for i in 1..=steps {
                        let t = i as f32 / steps as f32;
                        let a = from.lerp(control, t);
                        let b = control.lerp(to, t);
                        line.push(a.lerp(b, t));
                    }
                    pen = Some(to);
                }
            }
        }
        lines
    }
}

/// The polyline currently being extended, starting one if a segment arrives
/// before any `MoveTo`.
fn current(lines: &mut Vec<Vec<Vec2>>, pen: Option<Vec2>) -> &mut Vec<Vec2> {
    if lines.is_empty() {
        lines.push(pen.into_iter().collect());
    }
    let last = lines.len() - 1;
    &mut lines[last]
}

/// A sizable 2D drawing surface.
///
/// Coordinates are logical pixels with the origin at the top left.
pub trait Surface {
    fn size(&self) -> Size;

    /// Change the size. Existing content may be discarded.
    fn resize(&mut self, size: Size);

    /// Compositing for subsequent fills and strokes.
    fn set_blend(&mut self, mode: BlendMode);

    fn fill_rect(&mut self, region: Region, color: Rgba);

    fn stroke(&mut self, path: &Path, color: Rgba, width: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f32, f32)]) -> Vec<Vec2> {
        coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    #[test]
    fn test_smoothed_path_shape() {
        let mut path = Path::new();
        path.set_smoothed(pts(&[(0.0, 0.0), (10.0, 0.0), (20.0, 10.0), (30.0, 10.0)]).into_iter());
        assert_eq!(
            path.segments(),
            &[
                PathSegment::MoveTo(Vec2::new(0.0, 0.0)),
                PathSegment::QuadTo {
                    control: Vec2::new(10.0, 0.0),
                    to: Vec2::new(15.0, 5.0),
                },
                PathSegment::QuadTo {
                    control: Vec2::new(20.0, 10.0),
                    to: Vec2::new(25.0, 10.0),
                },
                PathSegment::LineTo(Vec2::new(30.0, 10.0)),
            ]
        );
    }

    #[test]
    fn test_smoothed_two_points_is_a_line() {
        let mut path = Path::new();
        path.set_smoothed(pts(&[(1.0, 1.0), (2.0, 2.0)]).into_iter());
        assert_eq!(
            path.segments(),
            &[
                PathSegment::MoveTo(Vec2::new(1.0, 1.0)),
                PathSegment::LineTo(Vec2::new(2.0, 2.0)),
            ]
        );
    }

    #[test]
    fn test_smoothed_empty() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO);
        path.set_smoothed(Vec::new().into_iter());
        assert!(path.is_empty());
    }

    #[test]
    fn test_flatten_quad_ends_on_target() {
        let mut path = Path::new();
        path.move_to(Vec2::new(0.0, 0.0));
        path.quad_to(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let lines = path.flatten(4);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 5);
        assert_eq!(lines[0][4], Vec2::new(10.0, 10.0));
    }
}
