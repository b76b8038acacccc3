//! Time facilities for the animation loop.
//!
//! The wind is a function of wall-clock time, so the engine reads
//! milliseconds since the Unix epoch from a [`Clock`]. Tests swap in a
//! [`ManualClock`]. [`FrameTimer`] tracks frame count and FPS for logging.
//!
//! # Example
//!
//! ```ignore
//! use sakura::time::{Clock, FrameTimer, SystemClock};
//!
//! let clock = SystemClock;
//! let mut timer = FrameTimer::new();
//!
//! // Once per presented frame:
//! engine.render(&mut batch, clock.now_ms());
//! if timer.update() {
//!     log::debug!("{:.1} fps", timer.fps());
//! }
//! ```

use std::cell::Cell;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            // A clock set before 1970 just freezes the wind
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Counts presented frames and measures FPS over one-second windows.
#[derive(Debug)]
pub struct FrameTimer {
    frame: u64,
    fps: f32,
    window_start: Instant,
    window_frames: u32,
    window: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    /// A timer that refreshes its FPS reading every `window`.
    pub fn with_window(window: Duration) -> Self {
        Self {
            frame: 0,
            fps: 0.0,
            window_start: Instant::now(),
            window_frames: 0,
            window,
        }
    }

    /// Record a frame. Returns `true` when the FPS value was refreshed.
    pub fn update(&mut self) -> bool {
        self.tick(Instant::now())
    }

    fn tick(&mut self, now: Instant) -> bool {
        self.frame += 1;
        self.window_frames += 1;

        let span = now.saturating_duration_since(self.window_start);
        if span < self.window {
            return false;
        }
        self.fps = self.window_frames as f32 / span.as_secs_f32();
        self.window_start = now;
        self.window_frames = 0;
        true
    }

    /// Frames recorded since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// FPS over the last completed window; zero until the first one ends.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
