//! Pointer emitter: particles are born at the pointer and flung outward by
//! a radial push and a swirl that both fade with distance.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, rngs::StdRng};
use slipstream_core::{BlendMode, EmitterConfig, FlowConfig, Size, Theme};
use tracing::debug;

use crate::pointer::PointerState;
use crate::surface::{Path, Region, Surface};

/// One emitted particle. Only the last frame's motion is drawn, so the
/// previous position is all the history it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub position: Vec2,
    pub previous: Vec2,
    pub velocity: Vec2,
    pub age: f32,
    pub lifespan: f32,
}

/// Simulation state of the emitter.
#[derive(Debug)]
pub struct EmitterState {
    config: FlowConfig,
    sparks: VecDeque<Spark>,
    pointer: PointerState,
    size: Size,
    rng: StdRng,
}

impl EmitterState {
    /// Starts empty; particles appear once frames run.
    pub fn new(config: FlowConfig, size: Size, rng: StdRng) -> Self {
        Self {
            config,
            sparks: VecDeque::new(),
            pointer: PointerState::default(),
            size,
            rng,
        }
    }

    /// Oldest first.
    pub fn sparks(&self) -> impl ExactSizeIterator<Item = &Spark> {
        self.sparks.iter()
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    /// Largest pool the current viewport allows.
    pub fn capacity(&self) -> usize {
        self.tuning().budget(self.size.width).1
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.moved(x, y);
    }

    /// Emit a batch at the pointer, move every particle, then drop the ones
    /// that expired or left the viewport.
    pub fn step(&mut self) {
        self.emit();

        let origin = self.origin();
        let cfg = &self.config.emitter;
        let drag = self.pointer.velocity * cfg.pointer_drag;
        for spark in &mut self.sparks {
            let offset = spark.position - origin;
            let distance_sq = offset.length_squared();
            let radial_dir = offset / (distance_sq.sqrt() + 1e-5);
            let radial = cfg.radial_strength * (-distance_sq / cfg.radial_scale.max(1.0)).exp();
            let swirl = cfg.swirl_strength * (-distance_sq / cfg.swirl_scale.max(1.0)).exp();

            spark.velocity += radial_dir * radial + radial_dir.perp() * swirl + drag;
            spark.velocity *= cfg.damping;
            spark.previous = spark.position;
            spark.position += spark.velocity * cfg.step_scale;
            spark.age += 1.0;
        }

        let size = self.size;
        self.sparks.retain(|spark| {
            spark.age <= spark.lifespan
                && spark.position.is_finite()
                && (0.0..=size.width).contains(&spark.position.x)
                && (0.0..=size.height).contains(&spark.position.y)
        });
        self.pointer.settle(self.config.pointer_velocity_decay);
    }

    /// Fade towards the background, then draw each particle's last move as
    /// one segment in the theme's emitter color.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, theme: Theme) {
        let cfg = self.tuning();
        let size = surface.size();
        surface.set_blend(BlendMode::Normal);
        surface.fill_rect(
            Region::covering(size),
            theme.background().with_alpha(cfg.fade_alpha),
        );

        surface.set_blend(theme.stroke_blend());
        let color = match theme {
            Theme::Dark => cfg.dark_color,
            Theme::Light => cfg.light_color,
        }
        .with_alpha(cfg.stroke_alpha);
        let mut path = Path::new();
        for spark in &self.sparks {
            path.clear();
            path.move_to(spark.previous);
            path.line_to(spark.position);
            surface.stroke(&path, color, cfg.line_width);
        }
        surface.set_blend(BlendMode::Normal);
    }

    /// Adopt a new viewport, dropping the oldest particles if the pool cap
    /// shrank.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        let cap = self.capacity();
        if self.sparks.len() > cap {
            debug!(from = self.sparks.len(), to = cap, "emitter pool trimmed");
            let excess = self.sparks.len() - cap;
            self.sparks.drain(..excess);
        }
    }

    fn tuning(&self) -> &EmitterConfig {
        &self.config.emitter
    }

    /// The pointer, or the middle of the viewport before it has moved.
    fn origin(&self) -> Vec2 {
        if self.pointer.has_sample() {
            self.pointer.position
        } else {
            Vec2::new(self.size.width, self.size.height) * 0.5
        }
    }

    fn emit(&mut self) {
        let (count, cap) = self.tuning().budget(self.size.width);
        if cap == 0 {
            return;
        }
        let origin = self.origin();
        let cfg = &self.config.emitter;
        let spread = cfg.spread.max(0.0);
        let velocity = self.pointer.velocity * cfg.velocity_share;
        for _ in 0..count {
            if self.sparks.len() >= cap {
                self.sparks.pop_front();
            }
            let jitter = Vec2::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            ) * spread;
            let position = origin + jitter;
            let lifespan =
                cfg.lifespan_min + self.rng.gen_range(0.0..1.0) * cfg.lifespan_span.max(0.0);
            self.sparks.push_back(Spark {
                position,
                previous: position,
                velocity,
                age: 0.0,
                lifespan,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, RecordingSurface};
    use rand::SeedableRng;
    use slipstream_core::FlowMode;

    const WIDE: Size = Size::new(1600.0, 900.0);

    fn config() -> FlowConfig {
        FlowConfig {
            mode: FlowMode::Emitter,
            ..Default::default()
        }
    }

    fn state(config: FlowConfig, size: Size) -> EmitterState {
        EmitterState::new(config, size, StdRng::seed_from_u64(61))
    }

    #[test]
    fn test_emits_at_the_pointer() {
        let mut emitter = state(config(), WIDE);
        emitter.pointer_moved(400.0, 300.0);
        emitter.step();
        assert_eq!(emitter.len(), 12);
        for spark in emitter.sparks() {
            assert!((spark.previous - Vec2::new(400.0, 300.0)).abs().max_element() <= 4.0);
        }
    }

    #[test]
    fn test_starts_at_centre_before_pointer_moves() {
        let mut emitter = state(config(), WIDE);
        emitter.step();
        for spark in emitter.sparks() {
            assert!((spark.previous - Vec2::new(800.0, 450.0)).length() < 6.0);
        }
    }

    #[test]
    fn test_pool_cap_evicts_oldest() {
        let mut cfg = config();
        cfg.emitter.max_particles = 30;
        cfg.emitter.emit_per_frame = 12;
        cfg.emitter.lifespan_min = 1_000.0;
        cfg.emitter.radial_strength = 0.0;
        cfg.emitter.swirl_strength = 0.0;
        let mut emitter = state(cfg, WIDE);
        emitter.pointer_moved(800.0, 450.0);
        emitter.step();
        let first_batch: Vec<Vec2> = emitter.sparks().map(|s| s.previous).collect();
        for _ in 0..5 {
            emitter.step();
            assert!(emitter.len() <= 30);
        }
        assert_eq!(emitter.len(), 30);
        // Oldest first: the first batch has been pushed out entirely.
        let survivors: Vec<Vec2> = emitter.sparks().map(|s| s.previous).collect();
        assert!(first_batch.iter().all(|p| !survivors.contains(p)));
        assert!(emitter.sparks().all(|s| s.age <= 3.0));
    }

    #[test]
    fn test_compact_viewport_uses_smaller_budget() {
        let mut emitter = state(config(), Size::new(800.0, 600.0));
        emitter.pointer_moved(400.0, 300.0);
        emitter.step();
        assert_eq!(emitter.len(), 4);
        assert_eq!(emitter.capacity(), 800);
    }

    #[test]
    fn test_born_with_share_of_pointer_velocity() {
        let mut cfg = config();
        cfg.emitter.radial_strength = 0.0;
        cfg.emitter.swirl_strength = 0.0;
        cfg.emitter.pointer_drag = 0.0;
        cfg.emitter.damping = 1.0;
        let mut emitter = state(cfg, WIDE);
        emitter.pointer_moved(400.0, 300.0);
        emitter.pointer_moved(440.0, 300.0);
        emitter.step();
        for spark in emitter.sparks() {
            assert!((spark.velocity - Vec2::new(4.0, 0.0)).length() < 1e-4);
        }
    }

    #[test]
    fn test_pushed_outward() {
        let mut cfg = config();
        cfg.emitter.swirl_strength = 0.0;
        cfg.emitter.emit_per_frame = 1;
        let mut emitter = state(cfg, WIDE);
        emitter.pointer_moved(800.0, 450.0);
        emitter.step();
        let start = emitter.sparks().next().unwrap().previous;
        for _ in 0..10 {
            emitter.step();
        }
        let oldest = emitter.sparks().next().unwrap();
        assert!(
            (oldest.position - Vec2::new(800.0, 450.0)).length()
                > (start - Vec2::new(800.0, 450.0)).length()
        );
    }

    #[test]
    fn test_leaving_the_viewport_removes() {
        let mut cfg = config();
        cfg.emitter.emit_per_frame = 0;
        let mut emitter = state(cfg, WIDE);
        emitter.sparks.push_back(Spark {
            position: Vec2::new(1599.0, 10.0),
            previous: Vec2::new(1599.0, 10.0),
            velocity: Vec2::new(20.0, 0.0),
            age: 0.0,
            lifespan: 100.0,
        });
        emitter.sparks.push_back(Spark {
            position: Vec2::new(10.0, 10.0),
            previous: Vec2::new(10.0, 10.0),
            velocity: Vec2::ZERO,
            age: 100.0,
            lifespan: 100.0,
        });
        emitter.step();
        assert!(emitter.is_empty());
    }

    #[test]
    fn test_resize_trims_oldest() {
        let mut cfg = config();
        cfg.emitter.radial_strength = 0.0;
        cfg.emitter.swirl_strength = 0.0;
        let mut emitter = state(cfg, WIDE);
        emitter.pointer_moved(800.0, 450.0);
        for _ in 0..100 {
            emitter.step();
        }
        assert!(emitter.len() > 800);
        let newest = emitter.sparks().last().cloned();
        emitter.resize(Size::new(800.0, 900.0));
        assert_eq!(emitter.len(), 800);
        assert_eq!(emitter.sparks().last().cloned(), newest);
    }

    #[test]
    fn test_draw_fades_then_strokes_segments() {
        let mut emitter = state(config(), WIDE);
        emitter.pointer_moved(800.0, 450.0);
        emitter.step();
        let mut surface = RecordingSurface::new(WIDE);
        emitter.draw(&mut surface, Theme::Dark);

        assert_eq!(surface.ops[0], Op::Blend(BlendMode::Normal));
        let (_, fade) = surface.fills().next().unwrap();
        assert_eq!(fade.alpha, 0.06);
        assert_eq!(surface.strokes().count(), emitter.len());
        assert!(surface.ops.contains(&Op::Blend(BlendMode::Screen)));
        assert_eq!(surface.ops.last(), Some(&Op::Blend(BlendMode::Normal)));
    }
}
