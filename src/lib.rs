//! # Sakura - falling petal animation
//!
//! A small pool of sakura petal sprites drifting across a window, pushed by
//! a slowly oscillating wind and by where the pointer sits on screen.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sakura::prelude::*;
//!
//! fn main() -> Result<(), SakuraError> {
//!     sakura::run(SakuraConfig::default().with_petal_count(40))
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Engine
//!
//! [`Engine`] owns the petals, the surface size, the global wind and the
//! pointer bias. It does not know about windows or GPUs: the host calls
//! [`Engine::render`] with any [`DrawContext`] once per display refresh.
//!
//! ### Petals
//!
//! Each frame a [`Petal`]:
//!
//! 1. respawns above the top edge if it has left the surface on the right or bottom,
//! 2. blends global wind and its own wind bias into its speed,
//! 3. clamps its speed so it always drifts left and falls,
//! 4. moves (further right and down the further right the pointer is),
//! 5. spins and draws itself.
//!
//! ### Drawing
//!
//! [`DrawContext`] is a canvas-like API. [`SpriteBatch`] records draws as
//! GPU instances; the bundled wgpu renderer turns those into textured quads.
//!
//! ## Configuration
//!
//! Every constant lives in [`SakuraConfig`] and can be loaded from RON with
//! [`SakuraConfig::from_file`].

mod app;
pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
mod gpu;
pub mod input;
pub mod petal;
pub mod sprite;
pub mod time;
pub mod wind;

pub use app::run;
pub use config::{PointerPush, SakuraConfig, SpeedLimit, WindConfig, WindowConfig};
pub use draw::{DrawContext, SpriteBatch, SpriteInstance};
pub use engine::{Engine, EngineState, FrameHandle, FrameOutcome};
pub use error::{ConfigError, GpuError, SakuraError, SpriteError};
pub use input::PointerEvent;
pub use petal::{FrameContext, Petal};
pub use sprite::{FilterMode, SpriteImage, SpriteLoader, SpriteSource};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use sakura::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SakuraConfig;
    pub use crate::draw::{DrawContext, SpriteBatch};
    pub use crate::engine::{Engine, EngineState, FrameOutcome};
    pub use crate::error::SakuraError;
    pub use crate::input::PointerEvent;
    pub use crate::petal::Petal;
    pub use crate::time::{Clock, SystemClock};
}
