//! A single falling petal.
//!
//! Petals are plain state records. Each frame the engine hands every petal
//! the same read-only [`FrameContext`], and the petal recycles itself when
//! it has left the surface, updates its velocity and position, then draws.

use rand::Rng;

use crate::config::SakuraConfig;
use crate::draw::DrawContext;

/// Read-only view of the engine state shared by all petals in one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub config: &'a SakuraConfig,
    /// Surface width in pixels.
    pub width: f32,
    /// Surface height in pixels.
    pub height: f32,
    /// Global wind for this frame.
    pub wind_direction: f32,
    /// Normalized pointer x in `[0, 1]`.
    pub pointer_bias: f32,
}

/// One petal sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Petal {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
    /// Rotation in radians.
    pub rotate: f32,
    pub rotate_speed: f32,
    pub x_speed: f32,
    pub y_speed: f32,
    /// Fixed wind bias added to the global wind.
    pub wind_force: f32,
    /// Fixed factor the speed is multiplied by every frame.
    pub speed_variation: f32,
}

impl Petal {
    /// Create a petal with its fixed wind traits and a fresh reset.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: &SakuraConfig, surface_width: f32) -> Self {
        let mut petal = Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            opacity: 0.0,
            rotate: 0.0,
            rotate_speed: 0.0,
            x_speed: 0.0,
            y_speed: 0.0,
            wind_force: rng.gen_range(config.wind_force.clone()),
            speed_variation: rng.gen_range(config.speed_variation.clone()),
        };
        petal.reset(rng, config, surface_width);
        petal
    }

    /// Re-randomize size, rotation and speed, and respawn just above the top edge.
    ///
    /// `wind_force` and `speed_variation` are kept.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &SakuraConfig, surface_width: f32) {
        self.x = if surface_width > 0.0 {
            rng.gen_range(0.0..surface_width)
        } else {
            0.0
        };
        self.width = rng.gen_range(config.width.clone());
        self.height = rng.gen_range(config.height.clone());
        self.y = -self.height;
        self.opacity = self.width / config.opacity_divisor;
        self.rotate = rng.gen_range(config.rotation.clone());
        self.x_speed = rng.gen_range(config.x_speed.clone());
        self.y_speed = rng.gen_range(config.y_speed.clone());
        self.rotate_speed = rng.gen_range(config.rotate_speed.clone());
    }

    /// Past the right edge or below the bottom edge.
    #[inline]
    pub fn is_out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.x > width || self.y > height
    }

    /// Advance one frame without drawing. Returns `true` if the petal was recycled.
    pub fn step<R: Rng + ?Sized>(&mut self, frame: &FrameContext<'_>, rng: &mut R) -> bool {
        let config = frame.config;

        let recycled = self.is_out_of_bounds(frame.width, frame.height);
        if recycled {
            self.reset(rng, config, frame.width);
        }

        let current_wind = frame.wind_direction + self.wind_force;
        self.x_speed = self.x_speed * self.speed_variation + current_wind;
        self.y_speed =
            self.y_speed * self.speed_variation + current_wind * config.wind.vertical_coupling;

        self.x_speed = config.x_speed_limit.apply(self.x_speed);
        self.y_speed = config.y_speed_limit.apply(self.y_speed);

        self.x += self.x_speed + frame.pointer_bias * config.pointer_push.x;
        self.y += self.y_speed + frame.pointer_bias * config.pointer_push.y;
        self.rotate += self.rotate_speed;

        recycled
    }

    /// Draw the sprite centred on the petal's position.
    pub fn draw<C: DrawContext + ?Sized>(&self, ctx: &mut C) {
        ctx.save();
        ctx.set_global_alpha(self.opacity);
        ctx.translate(self.x, self.y);
        ctx.rotate(self.rotate);
        ctx.draw_image(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width,
            self.height,
        );
        ctx.restore();
    }

    /// Full per-frame update: recycle if needed, move, then draw.
    ///
    /// A recycled petal is drawn at its new spawn point in the same frame.
    pub fn animate<R, C>(&mut self, frame: &FrameContext<'_>, rng: &mut R, ctx: &mut C) -> bool
    where
        R: Rng + ?Sized,
        C: DrawContext + ?Sized,
    {
        let recycled = self.step(frame, rng);
        self.draw(ctx);
        recycled
    }
}
