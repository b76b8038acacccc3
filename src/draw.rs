//! Canvas-style drawing context.
//!
//! Petals draw themselves through the [`DrawContext`] trait, a small subset
//! of the HTML canvas 2D API: a transform and alpha state with a
//! `save`/`restore` stack, clearing, and `draw_image` of the petal
//! sprite. [`SpriteBatch`] implements it by baking each `draw_image` call
//! into a GPU-ready [`SpriteInstance`].

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2};

/// Immediate-mode 2D drawing surface.
///
/// Coordinates are in surface pixels, origin top-left, y down.
pub trait DrawContext {
    /// Erase the whole surface.
    fn clear(&mut self);
    /// Push the current transform and alpha.
    fn save(&mut self);
    /// Pop the transform and alpha pushed by the matching [`save`](Self::save).
    fn restore(&mut self);
    fn set_global_alpha(&mut self, alpha: f32);
    fn translate(&mut self, x: f32, y: f32);
    /// Rotate clockwise (on screen) by `angle` radians.
    fn rotate(&mut self, angle: f32);
    /// Draw the sprite stretched into the given rectangle.
    fn draw_image(&mut self, x: f32, y: f32, width: f32, height: f32);
}

/// One sprite quad as uploaded to the GPU.
///
/// The quad covers `translation + x_axis * u + y_axis * v` for
/// `u, v` in `[0, 1]`, in surface pixels.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub x_axis: [f32; 2],
    pub y_axis: [f32; 2],
    pub translation: [f32; 2],
    pub alpha: f32,
    pub _pad: f32,
}

impl SpriteInstance {
    /// Centre of the quad in surface pixels.
    pub fn center(&self) -> Vec2 {
        Vec2::from(self.translation) + (Vec2::from(self.x_axis) + Vec2::from(self.y_axis)) * 0.5
    }

    /// Length of the quad's edges (width, height) in pixels.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(Vec2::from(self.x_axis).length(), Vec2::from(self.y_axis).length())
    }
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Collects sprite draws for one frame.
#[derive(Debug, Default)]
pub struct SpriteBatch {
    state: DrawState,
    stack: Vec<DrawState>,
    instances: Vec<SpriteInstance>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Sprites drawn since the last clear, in draw order.
    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Current global alpha.
    pub fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    /// Current transform.
    pub fn transform(&self) -> Affine2 {
        self.state.transform
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl DrawContext for SpriteBatch {
    fn clear(&mut self) {
        self.instances.clear();
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        // Unbalanced restore is a no-op, as on a canvas
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(angle);
    }

    fn draw_image(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let m = self.state.transform
            * Affine2::from_translation(Vec2::new(x, y))
            * Affine2::from_scale(Vec2::new(width, height));
        self.instances.push(SpriteInstance {
            x_axis: m.matrix2.x_axis.to_array(),
            y_axis: m.matrix2.y_axis.to_array(),
            translation: m.translation.to_array(),
            alpha: self.state.alpha,
            _pad: 0.0,
        });
    }
}
