//! Waxy (crayon) brush: jittered disks modulated by a reusable grain texture

use glam::Vec2;
use rand::rngs::StdRng;
use tracing::debug;

use super::{Brush, BrushKind, BrushParams, random_offset, subdivide};
use crate::constants::{
    WAXY_BASE_ALPHA, WAXY_JITTER_DIVISOR, WAXY_STEP_DISTANCE, WAXY_TEXTURE_ALPHA,
};
use crate::render::{RenderTarget, Scoped};
use crate::surface::CpuSurface;
use crate::texture::grain_texture;
use crate::types::BlendMode;

pub struct WaxyBrush {
    params: BrushParams,
    rng: StdRng,
    texture: CpuSurface,
}

impl WaxyBrush {
    /// Build the brush and its grain texture. The texture is generated once
    /// and shared by every stroke this brush draws.
    pub fn new(params: BrushParams, mut rng: StdRng) -> Self {
        let texture = grain_texture(&mut rng);
        Self {
            params,
            rng,
            texture,
        }
    }

    pub fn texture(&self) -> &CpuSurface {
        &self.texture
    }

    /// Solid base disk followed by the grain pass clipped to the same disk
    fn stamp(&self, target: &mut dyn RenderTarget, center: Vec2) {
        let size = self.params.size();
        let radius = size / 2.0;
        let color = self.params.color;

        let mut scope = Scoped::new(target);
        scope.set_blend_mode(BlendMode::Normal);
        scope.set_alpha(WAXY_BASE_ALPHA);
        scope.fill_circle(center, radius, color);

        scope.set_alpha(WAXY_TEXTURE_ALPHA);
        scope.set_blend_mode(BlendMode::Overlay);
        scope.clip_circle(center, radius);
        scope.blit_image(&self.texture, center - Vec2::splat(radius), Vec2::splat(size));
    }
}

impl Brush for WaxyBrush {
    fn kind(&self) -> BrushKind {
        BrushKind::Waxy
    }

    fn params(&self) -> &BrushParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut BrushParams {
        &mut self.params
    }

    fn start_stroke(&mut self, target: &mut dyn RenderTarget, point: Vec2) {
        let mut scope = Scoped::new(target);
        scope.set_alpha(WAXY_BASE_ALPHA);
        scope.fill_circle(point, self.params.size() / 2.0, self.params.color);
    }

    fn continue_stroke(&mut self, target: &mut dyn RenderTarget, from: Vec2, to: Vec2) {
        let jitter = self.params.size() / WAXY_JITTER_DIVISOR;
        let mut stamps = 0usize;
        for point in subdivide(from, to, WAXY_STEP_DISTANCE) {
            let center = point + random_offset(&mut self.rng, jitter);
            self.stamp(target, center);
            stamps += 1;
        }
        debug!("WaxyBrush::continue_stroke: {} stamps", stamps);
    }
}
