//! Procedural grain texture used by the waxy brush

use glam::Vec2;
use rand::Rng;

use crate::brush::random_between;
use crate::constants::{GRAIN_DOT_COUNT, GRAIN_MAX_ALPHA, GRAIN_MAX_RADIUS, GRAIN_TEXTURE_SIZE};
use crate::render::{Canvas, RenderTarget};
use crate::surface::CpuSurface;
use crate::types::ColorRgb;

/// Render the stochastic wax grain: many faint black dots scattered over a
/// transparent square. Generated once per brush and reused for every stamp.
pub fn grain_texture<R: Rng + ?Sized>(rng: &mut R) -> CpuSurface {
    let extent = GRAIN_TEXTURE_SIZE as f32;
    let mut canvas = Canvas::new(GRAIN_TEXTURE_SIZE, GRAIN_TEXTURE_SIZE);

    for _ in 0..GRAIN_DOT_COUNT {
        let center = Vec2::new(random_between(rng, 0.0, extent), random_between(rng, 0.0, extent));
        let radius = random_between(rng, 0.0, GRAIN_MAX_RADIUS);
        canvas.set_alpha(random_between(rng, 0.0, GRAIN_MAX_ALPHA));
        canvas.fill_circle(center, radius, ColorRgb::BLACK);
    }

    canvas.into_surface()
}
