//! Liquid (watercolor) brush
//!
//! Each step renders the whole palette as overlapping translucent circles so
//! the variations bleed into each other. Fast strokes occasionally throw
//! splatter drops to the side; drops persist for the rest of the stroke and
//! swell every time the stroke is rendered.

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use super::{Brush, BrushKind, BrushParams, random_between, random_offset, subdivide};
use crate::constants::{
    LIQUID_CENTER_JITTER, LIQUID_CHANNEL_JITTER, LIQUID_MAX_VARIATION_ALPHA,
    LIQUID_MIN_VARIATION_ALPHA, LIQUID_SPLATTER_CHANCE, LIQUID_SPLATTER_MAX_GROWTH,
    LIQUID_SPLATTER_MIN_DISTANCE, LIQUID_STEP_DISTANCE, PALETTE_SIZE,
};
use crate::render::{RenderTarget, Scoped};
use crate::scheduler::FrameScheduler;
use crate::types::ColorRgb;

/// One entry of the bleeding palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorVariation {
    pub color: ColorRgb,
    pub alpha: f32,
}

/// A decorative blob thrown off the stroke path
#[derive(Debug, Clone, PartialEq)]
pub struct SplatterDrop {
    pub position: Vec2,
    /// Diameter in pixels; only ever grows
    pub size: f32,
    /// Index into the palette
    pub variation: usize,
    pub growth_rate: f32,
}

pub struct LiquidBrush {
    params: BrushParams,
    rng: StdRng,
    palette: Vec<ColorVariation>,
    splatter: Vec<SplatterDrop>,
}

impl LiquidBrush {
    pub fn new(params: BrushParams, rng: StdRng) -> Self {
        let mut brush = Self {
            params,
            rng,
            palette: Vec::with_capacity(PALETTE_SIZE),
            splatter: Vec::new(),
        };
        brush.regenerate_palette();
        brush
    }

    pub fn palette(&self) -> &[ColorVariation] {
        &self.palette
    }

    pub fn splatter(&self) -> &[SplatterDrop] {
        &self.splatter
    }

    fn regenerate_palette(&mut self) {
        let base = self.params.color;
        self.palette.clear();
        for _ in 0..PALETTE_SIZE {
            let dr = random_between(&mut self.rng, -LIQUID_CHANNEL_JITTER, LIQUID_CHANNEL_JITTER);
            let dg = random_between(&mut self.rng, -LIQUID_CHANNEL_JITTER, LIQUID_CHANNEL_JITTER);
            let db = random_between(&mut self.rng, -LIQUID_CHANNEL_JITTER, LIQUID_CHANNEL_JITTER);
            let alpha = random_between(
                &mut self.rng,
                LIQUID_MIN_VARIATION_ALPHA,
                LIQUID_MAX_VARIATION_ALPHA,
            );
            self.palette.push(ColorVariation {
                color: base.offset(dr, dg, db),
                alpha,
            });
        }
    }

    /// All palette circles around one path point
    fn render_bleed(&mut self, target: &mut dyn RenderTarget, point: Vec2) {
        let size = self.params.size();
        for variation in &self.palette {
            let radius = size * random_between(&mut self.rng, 0.8, 1.2) / 2.0;
            let center = point + random_offset(&mut self.rng, LIQUID_CENTER_JITTER);
            let mut scope = Scoped::new(target);
            scope.set_alpha(variation.alpha);
            scope.fill_circle(center, radius, variation.color);
        }
    }

    /// Throw a drop somewhere ahead of `point`, within 45 degrees of travel
    fn spawn_drop(&mut self, point: Vec2, travel_angle: f32) {
        let size = self.params.size();
        let distance = random_between(&mut self.rng, 0.0, size * 2.0);
        let angle = travel_angle + random_between(&mut self.rng, -FRAC_PI_4, FRAC_PI_4);
        let drop = SplatterDrop {
            position: point + Vec2::from_angle(angle) * distance,
            size: size * random_between(&mut self.rng, 0.1, 0.4),
            variation: self.rng.random_range(0..self.palette.len().max(1)),
            growth_rate: random_between(&mut self.rng, 0.0, LIQUID_SPLATTER_MAX_GROWTH),
        };
        debug!(
            "LiquidBrush: splatter at ({:.1}, {:.1}) size={:.2}",
            drop.position.x, drop.position.y, drop.size
        );
        self.splatter.push(drop);
    }

    /// Grow every drop and draw it with a freshly dimmed alpha
    fn render_splatter(&mut self, target: &mut dyn RenderTarget) {
        for drop in &mut self.splatter {
            drop.size += drop.growth_rate;
            let Some(variation) = self.palette.get(drop.variation) else {
                continue;
            };
            let mut scope = Scoped::new(target);
            scope.set_alpha(variation.alpha * random_between(&mut self.rng, 0.5, 1.0));
            scope.fill_circle(drop.position, drop.size / 2.0, variation.color);
        }
    }
}

impl Brush for LiquidBrush {
    fn kind(&self) -> BrushKind {
        BrushKind::Liquid
    }

    fn params(&self) -> &BrushParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut BrushParams {
        &mut self.params
    }

    fn set_color(&mut self, color: ColorRgb) {
        self.params.color = color;
        self.regenerate_palette();
    }

    fn start_stroke(&mut self, _target: &mut dyn RenderTarget, _point: Vec2) {
        self.splatter.clear();
        self.regenerate_palette();
    }

    fn continue_stroke(&mut self, target: &mut dyn RenderTarget, from: Vec2, to: Vec2) {
        let distance = from.distance(to);
        let delta = to - from;
        let travel_angle = delta.y.atan2(delta.x);
        let may_splatter = distance > LIQUID_SPLATTER_MIN_DISTANCE;

        for point in subdivide(from, to, LIQUID_STEP_DISTANCE) {
            self.render_bleed(target, point);
            if may_splatter && self.rng.random_bool(LIQUID_SPLATTER_CHANCE) {
                self.spawn_drop(point, travel_angle);
            }
        }

        self.render_splatter(target);
    }

    fn end_stroke(&mut self, target: &mut dyn RenderTarget, _scheduler: &mut dyn FrameScheduler) {
        self.render_splatter(target);
        debug!("LiquidBrush::end_stroke: {} drops", self.splatter.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;
    use crate::scheduler::ManualScheduler;
    use rand::SeedableRng;

    fn brush(seed: u64) -> LiquidBrush {
        let params = BrushParams::new(12.0, ColorRgb::new(0x20, 0x60, 0xc0)).unwrap();
        LiquidBrush::new(params, StdRng::seed_from_u64(seed))
    }

    /// Long zigzag segments, roughly a thousand splatter rolls
    fn scribble(liquid: &mut LiquidBrush, canvas: &mut Canvas) {
        let mut last = Vec2::new(10.0, 10.0);
        liquid.start_stroke(canvas, last);
        for i in 1..20 {
            let next = Vec2::new(10.0 + i as f32 * 12.0, if i % 2 == 0 { 10.0 } else { 60.0 });
            liquid.continue_stroke(canvas, last, next);
            last = next;
        }
    }

    #[test]
    fn test_palette_tracks_base_color() {
        let mut liquid = brush(1);
        assert_eq!(liquid.palette().len(), PALETTE_SIZE);
        for variation in liquid.palette() {
            assert!((variation.color.r as i32 - 0x20).abs() <= 20);
            assert!((variation.color.b as i32 - 0xc0).abs() <= 20);
            assert!(variation.alpha >= LIQUID_MIN_VARIATION_ALPHA);
            assert!(variation.alpha <= LIQUID_MAX_VARIATION_ALPHA);
        }

        liquid.set_color(ColorRgb::WHITE);
        for variation in liquid.palette() {
            assert!(variation.color.g >= 235);
        }
    }

    #[test]
    fn test_splatter_only_grows() {
        let mut liquid = brush(7);
        let mut canvas = Canvas::new(300, 100);
        let mut scheduler = ManualScheduler::new();
        scribble(&mut liquid, &mut canvas);
        assert!(!liquid.splatter().is_empty());

        let sizes: Vec<f32> = liquid.splatter().iter().map(|d| d.size).collect();
        liquid.end_stroke(&mut canvas, &mut scheduler);
        for (drop, before) in liquid.splatter().iter().zip(&sizes) {
            assert!(drop.size >= *before);
        }
    }

    #[test]
    fn test_start_stroke_resets_splatter() {
        let mut liquid = brush(7);
        let mut canvas = Canvas::new(300, 100);
        scribble(&mut liquid, &mut canvas);
        assert!(!liquid.splatter().is_empty());

        liquid.start_stroke(&mut canvas, Vec2::ZERO);
        assert!(liquid.splatter().is_empty());
    }

    #[test]
    fn test_short_segments_never_splatter() {
        let mut liquid = brush(3);
        let mut canvas = Canvas::new(200, 50);
        liquid.start_stroke(&mut canvas, Vec2::new(0.0, 20.0));
        for i in 0..150 {
            let from = Vec2::new(i as f32, 20.0);
            liquid.continue_stroke(&mut canvas, from, from + Vec2::new(1.0, 0.0));
        }
        assert!(liquid.splatter().is_empty());
    }

    #[test]
    fn test_click_leaves_no_buffers() {
        let mut liquid = brush(5);
        let mut canvas = Canvas::new(32, 32);
        let mut scheduler = ManualScheduler::new();
        liquid.start_stroke(&mut canvas, Vec2::new(16.0, 16.0));
        liquid.end_stroke(&mut canvas, &mut scheduler);
        assert!(liquid.splatter().is_empty());
        assert_eq!(canvas.surface().painted_pixel_count(), 0);
    }
}
