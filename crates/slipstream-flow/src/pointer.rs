//! Latest pointer sample.

use glam::Vec2;

/// Where the pointer sits until the first sample arrives: far enough away
/// that it influences nothing.
pub const PARKED: Vec2 = Vec2::new(-10_000.0, -10_000.0);

/// Pointer position and instantaneous velocity, in logical pixels.
///
/// Only the latest sample matters; nothing is queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub velocity: Vec2,
    seen: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: PARKED,
            velocity: Vec2::ZERO,
            seen: false,
        }
    }
}

impl PointerState {
    /// Record a new sample. Velocity is the delta from the previous sample;
    /// the very first sample has none. Non-finite samples are dropped.
    pub fn moved(&mut self, x: f32, y: f32) {
        let next = Vec2::new(x, y);
        if !next.is_finite() {
            return;
        }
        self.velocity = if self.seen {
            next - self.position
        } else {
            Vec2::ZERO
        };
        self.position = next;
        self.seen = true;
    }

    /// Whether any sample has arrived yet.
    pub fn has_sample(&self) -> bool {
        self.seen
    }

    /// Let the remembered velocity die down between samples.
    pub fn settle(&mut self, decay: f32) {
        self.velocity *= decay.clamp(0.0, 1.0);
    }
}
