//! Immediate-mode drawing interface shared by all brushes
//!
//! Brushes never touch pixels directly. They issue draw calls against a
//! [`RenderTarget`], which owns a save/restore stack of [`DrawState`] so that
//! alpha, blend mode and clip settings made for one stamp cannot leak into the
//! next one. [`Scoped`] ties a save to a guaranteed restore.

mod canvas;

use std::ops::{Deref, DerefMut};

use glam::Vec2;

use crate::surface::CpuSurface;
use crate::types::{BlendMode, ColorRgb, LineStyle};

pub use canvas::Canvas;

/// A circular clip region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipCircle {
    pub center: Vec2,
    pub radius: f32,
}

/// Style state applied to every draw call until the next `restore`
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    /// Global alpha multiplier, 0.0-1.0
    pub alpha: f32,
    pub blend_mode: BlendMode,
    /// Active clips; a pixel must lie inside all of them
    pub clips: Vec<ClipCircle>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
            clips: Vec::new(),
        }
    }
}

/// A mutable 2D pixel surface that brushes draw into
pub trait RenderTarget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Push a copy of the current draw state
    fn save(&mut self);
    /// Pop back to the last saved draw state (no-op on an empty stack)
    fn restore(&mut self);

    fn set_alpha(&mut self, alpha: f32);
    fn set_blend_mode(&mut self, mode: BlendMode);
    /// Intersect the current clip with a circle
    fn clip_circle(&mut self, center: Vec2, radius: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: ColorRgb);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &LineStyle);
    /// Draw `image` scaled into the rectangle at `origin` with extent `size`
    fn blit_image(&mut self, image: &CpuSurface, origin: Vec2, size: Vec2);
    /// Reset a rectangle to transparent
    fn clear_rect(&mut self, origin: Vec2, size: Vec2);
}

/// Saves the target's draw state on creation and restores it on drop
pub struct Scoped<'a> {
    target: &'a mut dyn RenderTarget,
}

impl<'a> Scoped<'a> {
    pub fn new(target: &'a mut dyn RenderTarget) -> Self {
        target.save();
        Self { target }
    }
}

impl<'a> Deref for Scoped<'a> {
    type Target = dyn RenderTarget + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.target
    }
}

impl<'a> DerefMut for Scoped<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.target
    }
}

impl Drop for Scoped<'_> {
    fn drop(&mut self) {
        self.target.restore();
    }
}
