//! Global wind field.
//!
//! The wind is a single scalar recomputed every frame from wall-clock time.
//! It oscillates slowly (a full period is roughly 12.5 seconds with the
//! default frequency) and is applied to every petal's velocity.

use crate::config::WindConfig;

/// Wind strength at wall-clock time `now_ms` (milliseconds since the epoch).
///
/// The phase is computed in `f64`: epoch milliseconds are far beyond the
/// range where `f32` can resolve a slow sine.
#[inline]
pub fn wind_at(now_ms: f64, config: &WindConfig) -> f32 {
    ((now_ms * config.frequency).sin() as f32) * config.amplitude
}
