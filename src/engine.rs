//! The petal animation engine.
//!
//! [`Engine`] owns the petal pool, the surface size and the two scalars
//! every petal reads each frame: the global wind and the pointer bias. The
//! host drives it:
//!
//! 1. [`init`](Engine::init) with the viewport size, then start loading the
//!    sprite (see [`SpriteLoader`](crate::sprite::SpriteLoader)).
//! 2. [`sprite_ready`](Engine::sprite_ready) or
//!    [`sprite_failed`](Engine::sprite_failed) once the load finishes.
//! 3. [`render`](Engine::render) on every display refresh while
//!    [`is_scheduled`](Engine::is_scheduled) is true.
//! 4. Forward resizes to [`resize_canvas`](Engine::resize_canvas) and pointer
//!    movement to [`touch_handler`](Engine::touch_handler).
//! 5. [`stop`](Engine::stop) on teardown.
//!
//! ```ignore
//! let mut engine = Engine::new(SakuraConfig::default())?;
//! engine.init(800, 600);
//! engine.sprite_ready();
//!
//! let mut batch = SpriteBatch::new();
//! while engine.is_scheduled() {
//!     engine.render(&mut batch, SystemClock.now_ms());
//!     // upload batch.instances() ...
//! }
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SakuraConfig;
use crate::draw::DrawContext;
use crate::error::{ConfigError, SpriteError};
use crate::input::PointerEvent;
use crate::petal::{FrameContext, Petal};
use crate::wind::wind_at;

/// Lifecycle of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Created, surface not sized yet.
    Uninitialized,
    /// Waiting for the sprite image.
    Loading,
    /// Animating.
    Running,
    /// The sprite could not be loaded; nothing will be drawn.
    Degraded(String),
    /// Torn down; no more frames.
    Stopped,
}

/// A pending request for the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Sequence number of the requested frame.
    pub fn frame(&self) -> u64 {
        self.0
    }
}

/// What a call to [`Engine::render`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn.
    Drawn { petals: usize, recycled: usize },
    /// The surface has no area; nothing was drawn but the next frame is scheduled.
    Skipped,
    /// No frame was scheduled.
    Idle,
}

/// Falling-petal particle engine.
#[derive(Debug)]
pub struct Engine {
    config: SakuraConfig,
    width: u32,
    height: u32,
    petals: Vec<Petal>,
    wind_direction: f32,
    pointer_bias: f32,
    state: EngineState,
    scheduled: Option<FrameHandle>,
    frames_requested: u64,
    rng: StdRng,
}

impl Engine {
    /// Create an engine. The config is validated first.
    pub fn new(config: SakuraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            petals: Vec::with_capacity(config.petal_count),
            config,
            width: 0,
            height: 0,
            wind_direction: 0.0,
            pointer_bias: 0.0,
            state: EngineState::Uninitialized,
            scheduled: None,
            frames_requested: 0,
            rng,
        })
    }

    /// Size the surface to the viewport and wait for the sprite.
    pub fn init(&mut self, viewport_width: u32, viewport_height: u32) {
        if self.state != EngineState::Uninitialized {
            log::warn!("Engine::init called in state {:?}; ignoring", self.state);
            return;
        }
        self.resize_canvas(viewport_width, viewport_height);
        self.state = EngineState::Loading;
        log::info!(
            "Sakura engine initialised at {}x{}, waiting for sprite",
            viewport_width,
            viewport_height
        );
    }

    /// The sprite has loaded: fill the pool and start the loop.
    pub fn sprite_ready(&mut self) {
        if self.state != EngineState::Loading {
            log::warn!("Sprite arrived in state {:?}; ignoring", self.state);
            return;
        }

        let width = self.width as f32;
        self.petals.clear();
        for _ in 0..self.config.petal_count {
            self.petals.push(Petal::new(&mut self.rng, &self.config, width));
        }

        self.state = EngineState::Running;
        self.schedule();
        log::info!("Sprite ready, animating {} petals", self.petals.len());
    }

    /// The sprite failed to load: stay up without animating.
    pub fn sprite_failed(&mut self, err: &SpriteError) {
        if self.state == EngineState::Stopped {
            return;
        }
        log::error!("Sprite failed to load, petals disabled: {}", err);
        self.scheduled = None;
        self.state = EngineState::Degraded(err.to_string());
    }

    /// Recompute the global wind for wall-clock time `now_ms`.
    pub fn update_wind(&mut self, now_ms: f64) -> f32 {
        self.wind_direction = wind_at(now_ms, &self.config.wind);
        self.wind_direction
    }

    /// Run one animation frame and request the next.
    ///
    /// Does nothing unless a frame is scheduled.
    pub fn render<C: DrawContext + ?Sized>(&mut self, ctx: &mut C, now_ms: f64) -> FrameOutcome {
        let Some(handle) = self.scheduled.take() else {
            return FrameOutcome::Idle;
        };

        if self.width == 0 || self.height == 0 {
            log::debug!("Skipping frame {}: surface is {}x{}", handle.frame(), self.width, self.height);
            self.schedule();
            return FrameOutcome::Skipped;
        }

        self.update_wind(now_ms);

        ctx.clear();
        let (width, height) = (self.width as f32, self.height as f32);

        let frame = FrameContext {
            config: &self.config,
            width,
            height,
            wind_direction: self.wind_direction,
            pointer_bias: self.pointer_bias,
        };
        let mut recycled = 0;
        for petal in &mut self.petals {
            if petal.animate(&frame, &mut self.rng, &mut *ctx) {
                recycled += 1;
            }
        }

        log::trace!(
            "Frame {}: wind {:.5}, {} recycled",
            handle.frame(),
            self.wind_direction,
            recycled
        );

        self.schedule();
        FrameOutcome::Drawn {
            petals: self.petals.len(),
            recycled,
        }
    }

    /// Resize the surface. Petals keep their absolute positions.
    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        log::debug!("Surface resized to {}x{}", width, height);
        self.width = width;
        self.height = height;
    }

    /// Record the pointer position as a fraction of the surface width.
    ///
    /// Returns `false` and leaves the bias unchanged for events without a
    /// usable coordinate.
    pub fn touch_handler(&mut self, event: &PointerEvent) -> bool {
        match event.normalized_x(self.width as f64) {
            Some(bias) => {
                self.pointer_bias = bias;
                true
            }
            None => {
                log::trace!("Ignoring pointer event without coordinates: {:?}", event);
                false
            }
        }
    }

    /// Cancel the scheduled frame and shut the loop down.
    pub fn stop(&mut self) {
        if self.state != EngineState::Stopped {
            log::info!("Sakura engine stopped after {} frames", self.frames_requested);
        }
        self.scheduled = None;
        self.state = EngineState::Stopped;
    }

    fn schedule(&mut self) {
        self.frames_requested += 1;
        self.scheduled = Some(FrameHandle(self.frames_requested));
    }

    /// Whether the host should deliver another frame.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Whether the host should ask the window for another redraw.
    ///
    /// False while the surface has no area: the frame stays scheduled, and the
    /// host resumes redrawing once a resize gives the surface a size again.
    pub fn needs_redraw(&self) -> bool {
        self.is_scheduled() && self.width > 0 && self.height > 0
    }

    /// The pending frame request, if any.
    pub fn scheduled_frame(&self) -> Option<FrameHandle> {
        self.scheduled
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }

    /// Direct access to the pool, for embedding hosts and tests.
    pub fn petals_mut(&mut self) -> &mut [Petal] {
        &mut self.petals
    }

    pub fn wind_direction(&self) -> f32 {
        self.wind_direction
    }

    pub fn pointer_bias(&self) -> f32 {
        self.pointer_bias
    }

    /// Surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
