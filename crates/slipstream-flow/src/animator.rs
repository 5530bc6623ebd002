//! Mounting, running and tearing down the animation.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use slipstream_core::{FlowConfig, MAX_INTERVAL_MS, Size, Theme};
use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::simulation::Simulation;
use crate::surface::{Region, Surface};
use crate::theme::ThemeReader;

/// What the animator needs from its environment.
pub trait Host {
    type Surface: Surface;

    /// The drawing surface, or `None` when the host cannot draw.
    fn surface(&mut self) -> Option<Self::Surface>;

    /// Current viewport in logical pixels.
    fn viewport(&self) -> Size;

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Start delivering pointer and resize input.
    fn attach_listeners(&mut self) -> io::Result<()>;

    /// Stop delivering input. Called at most once per successful attach.
    fn detach_listeners(&mut self);
}

/// Shared stop flag, checked before every reschedule.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Deadline of the next frame, if one is scheduled.
#[derive(Debug, Clone)]
struct FrameClock {
    interval: Duration,
    next: Option<Instant>,
}

impl FrameClock {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    fn start(&mut self, now: Instant) {
        self.next = Some(now);
    }

    fn is_due(&self, now: Instant) -> bool {
        self.next.is_some_and(|due| now >= due)
    }

    fn schedule_after(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    fn cancel(&mut self) {
        self.next = None;
    }
}

#[derive(Debug)]
enum Mode {
    Animated(Box<Simulation>),
    /// Reduced motion: a single fill, repeated only when the theme or the
    /// viewport changes.
    Static { painted: Option<(Theme, Size)> },
}

/// A mounted animator. Tear it down with [`stop`]; dropping it does the
/// same.
pub struct AnimatorHandle<H: Host> {
    host: H,
    surface: H::Surface,
    theme: ThemeReader,
    mode: Mode,
    resize: Debouncer<Size>,
    clock: FrameClock,
    cancel: CancelToken,
    listening: bool,
}

/// Mount an animator on `host`, seeded from OS entropy.
///
/// Returns `None`, having touched nothing, when the host has no surface.
pub fn create<H: Host>(
    host: H,
    theme: ThemeReader,
    config: FlowConfig,
) -> Option<AnimatorHandle<H>> {
    create_with_rng(host, theme, config, StdRng::from_entropy())
}

/// [`create`] with an explicit random source.
pub fn create_with_rng<H: Host>(
    mut host: H,
    theme: ThemeReader,
    config: FlowConfig,
    rng: StdRng,
) -> Option<AnimatorHandle<H>> {
    let Some(mut surface) = host.surface() else {
        debug!("no drawing surface, animation disabled");
        return None;
    };
    let viewport = host.viewport();
    surface.resize(viewport);

    let resize = Debouncer::new(Duration::from_millis(
        config.resize_debounce_ms.min(MAX_INTERVAL_MS),
    ));
    let mut clock = FrameClock::new(Duration::from_millis(
        config.frame_interval_ms.clamp(1, MAX_INTERVAL_MS),
    ));

    if host.prefers_reduced_motion() {
        info!("reduced motion requested, painting a static backdrop");
        let mut handle = AnimatorHandle {
            host,
            surface,
            theme,
            mode: Mode::Static { painted: None },
            resize,
            clock,
            cancel: CancelToken::default(),
            listening: false,
        };
        handle.paint_static();
        return Some(handle);
    }

    let state = Simulation::new(config, viewport, rng);
    debug!(
        width = viewport.width,
        height = viewport.height,
        mode = ?state.mode(),
        particles = state.particle_count(),
        "animator mounted"
    );
    let listening = match host.attach_listeners() {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, "pointer input unavailable, animating without it");
            false
        }
    };
    clock.start(Instant::now());

    Some(AnimatorHandle {
        host,
        surface,
        theme,
        mode: Mode::Animated(Box::new(state)),
        resize,
        clock,
        cancel: CancelToken::default(),
        listening,
    })
}

/// Tear down: no further frames are scheduled and listeners are detached.
pub fn stop<H: Host>(mut handle: AnimatorHandle<H>) {
    handle.shutdown();
}

impl<H: Host> AnimatorHandle<H> {
    /// Run the frame callback if a frame is due. Returns whether anything
    /// was drawn.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &mut self.mode {
            Mode::Animated(state) => {
                if self.cancel.is_cancelled() {
                    self.clock.cancel();
                    return false;
                }
                if !self.clock.is_due(now) {
                    return false;
                }
                if let Some(size) = self.resize.poll(now) {
                    debug!(width = size.width, height = size.height, "applying resize");
                    self.surface.resize(size);
                    state.resize(size);
                }
                state.step();
                state.draw(&mut self.surface, self.theme.get());

                if self.cancel.is_cancelled() {
                    self.clock.cancel();
                } else {
                    self.clock.schedule_after(now);
                }
                true
            }
            Mode::Static { painted } => {
                if let Some(size) = self.resize.poll(now) {
                    self.surface.resize(size);
                }
                let current = (self.theme.get(), self.surface.size());
                if *painted == Some(current) {
                    return false;
                }
                self.paint_static();
                true
            }
        }
    }

    /// When [`tick`](Self::tick) next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.mode {
            Mode::Animated(_) if !self.cancel.is_cancelled() => self.clock.next,
            Mode::Animated(_) => None,
            Mode::Static { .. } => self.resize.deadline(),
        }
    }

    /// Pointer input, in logical pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Mode::Animated(state) = &mut self.mode {
            state.pointer_moved(x, y);
        }
    }

    /// Viewport resize input. Applied by a later tick once resizing has
    /// been quiet for the debounce period.
    pub fn resize_requested(&mut self, size: Size, now: Instant) {
        self.resize.push(size, now);
    }

    pub fn surface(&self) -> &H::Surface {
        &self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether frames are still being scheduled.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.clock.next.is_some()
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.mode, Mode::Animated(_))
    }

    pub fn particle_count(&self) -> usize {
        match &self.mode {
            Mode::Animated(state) => state.particle_count(),
            Mode::Static { .. } => 0,
        }
    }

    /// A token that stops the frame loop from anywhere. Listeners stay
    /// attached until [`stop`].
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn paint_static(&mut self) {
        let theme = self.theme.get();
        let size = self.surface.size();
        self.surface
            .fill_rect(Region::covering(size), theme.background().with_alpha(1.0));
        self.mode = Mode::Static {
            painted: Some((theme, size)),
        };
    }

    fn shutdown(&mut self) {
        let was_running = self.is_running();
        self.cancel.cancel();
        self.clock.cancel();
        if self.listening {
            self.host.detach_listeners();
            self.listening = false;
        }
        if was_running {
            debug!("animator stopped");
        }
    }
}

impl<H: Host> Drop for AnimatorHandle<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
