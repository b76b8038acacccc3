//! Pointer and touch input.
//!
//! Petals only care about one thing: how far across the window the pointer
//! is. [`PointerEvent`] carries the raw horizontal coordinate of a mouse
//! move or a touch move, and [`Input`] turns winit window events into
//! pointer events, following the first finger down when several touches are
//! active.

use winit::event::{TouchPhase, WindowEvent};

/// A pointer movement in window coordinates (physical pixels).
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Mouse or pen movement.
    Move { client_x: f64 },
    /// Touch movement; the first entry is the primary touch point.
    Touch { touches: Vec<f64> },
}

impl PointerEvent {
    /// Horizontal coordinate of the pointer, or the first touch point.
    ///
    /// Returns `None` for events without usable coordinates.
    pub fn client_x(&self) -> Option<f64> {
        let x = match self {
            PointerEvent::Move { client_x } => *client_x,
            PointerEvent::Touch { touches } => *touches.first()?,
        };
        x.is_finite().then_some(x)
    }

    /// `client_x / viewport_width`, clamped to `[0, 1]`.
    ///
    /// Returns `None` if the event has no coordinate or the viewport has no width.
    pub fn normalized_x(&self, viewport_width: f64) -> Option<f32> {
        if !(viewport_width > 0.0) {
            return None;
        }
        let x = self.client_x()?;
        Some((x / viewport_width).clamp(0.0, 1.0) as f32)
    }
}

/// Tracks touch identity across window events.
#[derive(Debug, Default)]
pub struct Input {
    /// Id of the touch currently steering the petals.
    primary_touch: Option<u64>,
}

impl Input {
    /// Create a new input tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit window event, returning a pointer event if it moved the pointer.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.pointer_moved(position.x)),
            WindowEvent::Touch(touch) => self.touch(touch.id, touch.phase, touch.location.x),
            _ => None,
        }
    }

    pub(crate) fn pointer_moved(&mut self, x: f64) -> PointerEvent {
        PointerEvent::Move { client_x: x }
    }

    /// Only movement of the primary touch is reported; other fingers are ignored.
    pub(crate) fn touch(&mut self, id: u64, phase: TouchPhase, x: f64) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started => {
                if self.primary_touch.is_none() {
                    self.primary_touch = Some(id);
                }
                None
            }
            TouchPhase::Moved => {
                // A move without a start (e.g. the touch began outside the window)
                // adopts that finger as primary
                let primary = *self.primary_touch.get_or_insert(id);
                if primary != id {
                    return None;
                }
                Some(PointerEvent::Touch { touches: vec![x] })
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.primary_touch == Some(id) {
                    self.primary_touch = None;
                }
                None
            }
        }
    }
}
