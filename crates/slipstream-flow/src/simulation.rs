//! The animations a mounted animator can run.

use rand::rngs::StdRng;
use slipstream_core::{FlowConfig, FlowMode, Size, Theme};

use crate::emitter::EmitterState;
use crate::state::FlowState;
use crate::surface::Surface;

/// State behind the frame callback, picked by [`FlowConfig::mode`].
#[derive(Debug)]
pub enum Simulation {
    Stream(FlowState),
    Emitter(EmitterState),
}

impl Simulation {
    pub fn new(config: FlowConfig, size: Size, rng: StdRng) -> Self {
        match config.mode {
            FlowMode::Stream => Self::Stream(FlowState::new(config, size, rng)),
            FlowMode::Emitter => Self::Emitter(EmitterState::new(config, size, rng)),
        }
    }

    pub fn mode(&self) -> FlowMode {
        match self {
            Self::Stream(_) => FlowMode::Stream,
            Self::Emitter(_) => FlowMode::Emitter,
        }
    }

    pub fn particle_count(&self) -> usize {
        match self {
            Self::Stream(state) => state.particles().len(),
            Self::Emitter(state) => state.len(),
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        match self {
            Self::Stream(state) => state.pointer_moved(x, y),
            Self::Emitter(state) => state.pointer_moved(x, y),
        }
    }

    pub fn step(&mut self) {
        match self {
            Self::Stream(state) => state.step(),
            Self::Emitter(state) => state.step(),
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, theme: Theme) {
        match self {
            Self::Stream(state) => state.draw(surface, theme),
            Self::Emitter(state) => state.draw(surface, theme),
        }
    }

    pub fn resize(&mut self, size: Size) {
        match self {
            Self::Stream(state) => state.resize(size),
            Self::Emitter(state) => state.resize(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_mode_selects_simulation() {
        let size = Size::new(1600.0, 900.0);
        let stream = Simulation::new(FlowConfig::default(), size, StdRng::seed_from_u64(71));
        assert_eq!(stream.mode(), FlowMode::Stream);
        assert!(stream.particle_count() > 0);

        let config = FlowConfig {
            mode: FlowMode::Emitter,
            ..Default::default()
        };
        let mut emitter = Simulation::new(config, size, StdRng::seed_from_u64(72));
        assert_eq!(emitter.mode(), FlowMode::Emitter);
        assert_eq!(emitter.particle_count(), 0);
        emitter.step();
        assert_eq!(emitter.particle_count(), 12);
    }
}
