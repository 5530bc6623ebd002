//! Simulation state of the flow-field animation.

use rand::rngs::StdRng;
use slipstream_core::{FlowConfig, Size, Theme};
use tracing::debug;

use crate::field::VelocityField;
use crate::lut::LutPair;
use crate::noise::NoiseField;
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::render;
use crate::surface::Surface;

/// Everything the frame callback mutates: the noise field, both color
/// tables, the particle pool and the pointer sample.
#[derive(Debug)]
pub struct FlowState {
    config: FlowConfig,
    noise: NoiseField,
    luts: LutPair,
    particles: Vec<Particle>,
    pointer: PointerState,
    size: Size,
    time: f32,
    rng: StdRng,
}

impl FlowState {
    /// Build the noise field and color tables and scatter a pool sized for
    /// the viewport.
    pub fn new(config: FlowConfig, size: Size, mut rng: StdRng) -> Self {
        let noise = NoiseField::new(&mut rng);
        let luts = LutPair::from_config(&config);
        let count = config.particles_for_area(size.area());
        let particles = (0..count)
            .map(|_| Particle::spawn(&mut rng, size, &config))
            .collect();
        Self {
            config,
            noise,
            luts,
            particles,
            pointer: PointerState::default(),
            size,
            time: 0.0,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.moved(x, y);
    }

    /// Advance the noise clock and every particle by one frame.
    pub fn step(&mut self) {
        self.time += self.config.time_step;
        let field = VelocityField {
            noise: &self.noise,
            config: &self.config,
            pointer: &self.pointer,
            size: self.size,
            time: self.time,
        };
        for particle in &mut self.particles {
            particle.advance(&field, &mut self.rng);
        }
        self.pointer.settle(self.config.pointer_velocity_decay);
    }

    /// Draw the current frame.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, theme: Theme) {
        render::draw_backdrop(surface, theme, &self.config);
        render::draw_particles(
            surface,
            &self.particles,
            self.luts.for_theme(theme),
            theme,
            &self.config,
        );
    }

    /// Adopt a new viewport. Particles keep their positions; the pool only
    /// grows or shrinks when the density tier changes.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        let wanted = self.config.particles_for_area(size.area());
        let current = self.particles.len();
        if wanted == current {
            return;
        }
        debug!(from = current, to = wanted, "particle density changed");
        if wanted < current {
            self.particles.truncate(wanted);
        } else {
            let Self {
                particles,
                rng,
                config,
                ..
            } = self;
            particles.extend((current..wanted).map(|_| Particle::spawn(rng, size, config)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn small_config() -> FlowConfig {
        FlowConfig {
            particle_count: 150,
            density_tiers: Vec::new(),
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_pointer_stays_finite() {
        let size = Size::new(1280.0, 720.0);
        let mut state = FlowState::new(small_config(), size, StdRng::seed_from_u64(41));
        state.pointer_moved(-10_000.0, -10_000.0);
        for _ in 0..1_000 {
            state.step();
            for particle in state.particles() {
                assert!(particle.velocity.is_finite());
                assert!(particle.position.is_finite());
            }
        }
    }

    #[test]
    fn test_pointer_inside_viewport_stays_finite() {
        let size = Size::new(1280.0, 720.0);
        let mut state = FlowState::new(small_config(), size, StdRng::seed_from_u64(42));
        for frame in 0..300 {
            let x = 200.0 + (frame % 50) as f32 * 10.0;
            state.pointer_moved(x, 360.0);
            state.step();
        }
        assert!(state.particles().iter().all(|p| p.velocity.is_finite()));
        assert!(state.particles().iter().all(|p| p.trail().len() <= 16));
    }

    #[test]
    fn test_time_advances_per_step() {
        let size = Size::new(100.0, 100.0);
        let mut state = FlowState::new(small_config(), size, StdRng::seed_from_u64(43));
        state.step();
        state.step();
        assert!((state.time() - 0.004).abs() < 1e-6);
    }

    #[test]
    fn test_pool_sized_by_density() {
        let config = FlowConfig::default();
        let state = FlowState::new(config, Size::new(640.0, 400.0), StdRng::seed_from_u64(44));
        assert_eq!(state.particles().len(), 500);
    }

    #[test]
    fn test_resize_keeps_positions_within_tier() {
        let mut state = FlowState::new(
            FlowConfig::default(),
            Size::new(1200.0, 800.0),
            StdRng::seed_from_u64(45),
        );
        let before: Vec<_> = state.particles().iter().map(|p| p.position).collect();
        state.resize(Size::new(1250.0, 800.0));
        let after: Vec<_> = state.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
        assert_eq!(state.size(), Size::new(1250.0, 800.0));
    }

    #[test]
    fn test_resize_changes_density() {
        let mut state = FlowState::new(
            FlowConfig::default(),
            Size::new(1200.0, 800.0),
            StdRng::seed_from_u64(46),
        );
        assert_eq!(state.particles().len(), 900);
        let kept = state.particles()[0].position;

        state.resize(Size::new(2400.0, 1600.0));
        assert_eq!(state.particles().len(), 1200);
        assert_eq!(state.particles()[0].position, kept);

        state.resize(Size::new(400.0, 300.0));
        assert_eq!(state.particles().len(), 500);
        assert_eq!(state.particles()[0].position, kept);
    }
}
