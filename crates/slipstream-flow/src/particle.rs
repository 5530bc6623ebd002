//! Particles and their bounded trails.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use slipstream_core::{FlowConfig, MAX_TRAIL_LENGTH, Size};

use crate::field::VelocityField;

/// Fixed-capacity history of recent positions. The oldest point is evicted
/// first once the trail is full. Capacity is capped at [`MAX_TRAIL_LENGTH`].
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_TRAIL_LENGTH);
        Self {
            points: VecDeque::with_capacity(capacity.min(64) + 1),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }
}

/// One strand of flow.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Frames since the last (re)spawn.
    pub age: f32,
    /// Age at which the particle is recycled.
    pub lifespan: f32,
    trail: Trail,
}

impl Particle {
    /// A particle for the initial scatter.
    ///
    /// Most land anywhere in the viewport; `offscreen_fraction` of them start
    /// just left of it so the inflow is already running. The starting age is
    /// staggered so the first generation does not fade in and out in lockstep.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, size: Size, config: &FlowConfig) -> Self {
        let x = if chance(rng, config.offscreen_fraction) {
            upstream_x(rng, config)
        } else {
            unit(rng) * size.width.max(1.0)
        };
        Self {
            position: Vec2::new(x, unit(rng) * size.height.max(1.0)),
            velocity: Vec2::new(config.base_velocity, 0.0),
            age: unit(rng) * config.initial_age_max.max(0.0),
            lifespan: new_lifespan(rng, config),
            trail: Trail::new(config.trail_length),
        }
    }

    /// Recycle in place: empty trail, age 0, fresh lifespan. Re-enters from
    /// the upstream edge except for the occasional reseed anywhere.
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, size: Size, config: &FlowConfig) {
        let x = if chance(rng, config.reseed_anywhere_chance) {
            unit(rng) * size.width.max(1.0)
        } else {
            upstream_x(rng, config)
        };
        self.position = Vec2::new(x, unit(rng) * size.height.max(1.0));
        self.velocity = Vec2::new(config.base_velocity, 0.0);
        self.age = 0.0;
        self.lifespan = new_lifespan(rng, config);
        self.trail.clear();
    }

    /// Advance one frame. Returns whether the particle was recycled.
    pub fn advance<R: Rng + ?Sized>(&mut self, field: &VelocityField<'_>, rng: &mut R) -> bool {
        let config = field.config;
        self.age += 1.0;

        let target = field.target_velocity(self.position);
        self.velocity += (target - self.velocity) * config.lag_factor;
        self.velocity += Vec2::new(unit(rng) - 0.5, unit(rng) - 0.5) * config.jitter;
        self.position += self.velocity;
        self.trail.push(self.position);

        let corrupt = !self.velocity.is_finite() || !self.position.is_finite();
        if corrupt || self.age > self.lifespan || self.has_left(field.size, config) {
            self.respawn(rng, field.size, config);
            return true;
        }
        false
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Past the trailing or side edges, with margins. The upstream edge gets
    /// a wider margin since that is where particles enter.
    fn has_left(&self, size: Size, config: &FlowConfig) -> bool {
        let Vec2 { x, y } = self.position;
        x > size.width + config.exit_margin_x
            || x < -2.0 * config.exit_margin_x.max(config.spawn_depth)
            || y > size.height + config.exit_margin_y
            || y < -config.exit_margin_y
    }
}

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..1.0)
}

fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f32) -> bool {
    unit(rng) < probability
}

fn upstream_x<R: Rng + ?Sized>(rng: &mut R, config: &FlowConfig) -> f32 {
    -unit(rng) * config.spawn_depth.max(0.0)
}

fn new_lifespan<R: Rng + ?Sized>(rng: &mut R, config: &FlowConfig) -> f32 {
    config.lifespan_min + unit(rng) * config.lifespan_span.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseField;
    use crate::pointer::PointerState;
    use rand::{SeedableRng, rngs::StdRng};

    const SIZE: Size = Size::new(1600.0, 800.0);

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), 3);
        let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_trail_bound_over_many_updates() {
        let mut rng = StdRng::seed_from_u64(21);
        let noise = NoiseField::new(&mut rng);
        let config = FlowConfig {
            trail_length: 12,
            ..Default::default()
        };
        let pointer = PointerState::default();
        let mut particle = Particle::spawn(&mut rng, SIZE, &config);
        for frame in 0..2_000 {
            let field = VelocityField {
                noise: &noise,
                config: &config,
                pointer: &pointer,
                size: SIZE,
                time: frame as f32 * config.time_step,
            };
            particle.advance(&field, &mut rng);
            assert!(particle.trail().len() <= 12);
        }
    }

    #[test]
    fn test_respawn_after_lifespan() {
        let mut rng = StdRng::seed_from_u64(22);
        let noise = NoiseField::new(&mut rng);
        let config = FlowConfig::default();
        let pointer = PointerState::default();
        let field = VelocityField {
            noise: &noise,
            config: &config,
            pointer: &pointer,
            size: SIZE,
            time: 0.0,
        };
        let mut particle = Particle::spawn(&mut rng, SIZE, &config);
        particle.position = Vec2::new(800.0, 400.0);
        particle.advance(&field, &mut rng);
        assert!(!particle.trail().is_empty());

        particle.age = particle.lifespan + 5.0;
        assert!(particle.advance(&field, &mut rng));
        assert_eq!(particle.age, 0.0);
        assert!(particle.trail().is_empty());
        assert!(particle.lifespan >= config.lifespan_min);
    }

    #[test]
    fn test_respawn_when_leaving_viewport() {
        let mut rng = StdRng::seed_from_u64(23);
        let noise = NoiseField::new(&mut rng);
        let config = FlowConfig::default();
        let pointer = PointerState::default();
        let field = VelocityField {
            noise: &noise,
            config: &config,
            pointer: &pointer,
            size: SIZE,
            time: 0.0,
        };
        let mut particle = Particle::spawn(&mut rng, SIZE, &config);
        particle.age = 10.0;
        particle.position = Vec2::new(SIZE.width + 500.0, 400.0);
        assert!(particle.advance(&field, &mut rng));
        assert_eq!(particle.age, 0.0);
        assert!(particle.position.x <= SIZE.width);
    }

    #[test]
    fn test_respawn_enters_upstream() {
        let mut rng = StdRng::seed_from_u64(24);
        let config = FlowConfig {
            reseed_anywhere_chance: 0.0,
            ..Default::default()
        };
        let mut particle = Particle::spawn(&mut rng, SIZE, &config);
        for _ in 0..100 {
            particle.respawn(&mut rng, SIZE, &config);
            assert!(particle.position.x <= 0.0);
            assert!(particle.position.x >= -config.spawn_depth);
            assert!((0.0..=SIZE.height).contains(&particle.position.y));
        }
    }

    #[test]
    fn test_spawn_offscreen_fraction() {
        let mut rng = StdRng::seed_from_u64(25);
        let config = FlowConfig {
            offscreen_fraction: 1.0,
            ..Default::default()
        };
        for _ in 0..50 {
            assert!(Particle::spawn(&mut rng, SIZE, &config).position.x <= 0.0);
        }
        let config = FlowConfig {
            offscreen_fraction: 0.0,
            ..Default::default()
        };
        for _ in 0..50 {
            let particle = Particle::spawn(&mut rng, SIZE, &config);
            assert!((0.0..=SIZE.width).contains(&particle.position.x));
            assert!(particle.age < config.initial_age_max);
        }
    }

    #[test]
    fn test_corrupt_velocity_is_recycled() {
        let mut rng = StdRng::seed_from_u64(26);
        let noise = NoiseField::new(&mut rng);
        let config = FlowConfig::default();
        let pointer = PointerState::default();
        let field = VelocityField {
            noise: &noise,
            config: &config,
            pointer: &pointer,
            size: SIZE,
            time: 0.0,
        };
        let mut particle = Particle::spawn(&mut rng, SIZE, &config);
        particle.velocity = Vec2::new(f32::NAN, 0.0);
        assert!(particle.advance(&field, &mut rng));
        assert!(particle.velocity.is_finite());
        assert!(particle.position.is_finite());
    }

    #[test]
    fn test_huge_trail_length_is_capped() {
        let mut trail = Trail::new(usize::MAX);
        assert_eq!(trail.capacity(), MAX_TRAIL_LENGTH);
        for i in 0..MAX_TRAIL_LENGTH + 10 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), MAX_TRAIL_LENGTH);
    }

    #[test]
    fn test_deep_upstream_entry_is_not_recycled() {
        let mut rng = StdRng::seed_from_u64(27);
        let config = FlowConfig {
            spawn_depth: 500.0,
            exit_margin_x: 50.0,
            reseed_anywhere_chance: 0.0,
            ..Default::default()
        };
        let mut particle = Particle::spawn(&mut rng, SIZE, &config);
        for _ in 0..200 {
            particle.respawn(&mut rng, SIZE, &config);
            assert!(!particle.has_left(SIZE, &config));
        }
        particle.position = Vec2::new(-1001.0, 400.0);
        assert!(particle.has_left(SIZE, &config));
    }
}
