//! Brush engine: the stroke protocol and its four procedural styles
//!
//! Every brush is a stateful object driven by `start_stroke`, one
//! `continue_stroke` per pointer move, and `end_stroke`. Brushes draw straight
//! into the [`RenderTarget`] they are lent; nothing about a stroke is kept once
//! its pixels are composited, apart from the living brush's airborne particles.

mod graphite;
mod liquid;
mod living;
mod waxy;

use std::fmt;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::animation::TickOutcome;
use crate::constants::MAX_SUBDIVISIONS;
use crate::error::{PaintError, validate_size};
use crate::render::RenderTarget;
use crate::scheduler::{FrameScheduler, TickHandle};
use crate::types::ColorRgb;

pub use graphite::{GraphiteBrush, TrackedPoint, pressure_for_speed, speed_for_distance};
pub use liquid::{ColorVariation, LiquidBrush, SplatterDrop};
pub use living::LivingBrush;
pub use waxy::WaxyBrush;

/// The available brush styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    /// Textured crayon-like stamps
    #[default]
    Waxy,
    /// Bleeding watercolor with growing splatter
    Liquid,
    /// Speed-sensitive pencil line with graphite specks
    Graphite,
    /// Particles that fall and evaporate after the stroke ends
    Living,
}

impl BrushKind {
    pub const ALL: [BrushKind; 4] = [Self::Waxy, Self::Liquid, Self::Graphite, Self::Living];

    /// Look up a brush by name. Also accepts the historical names
    /// `crayon`, `watercolor` and `pencil`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "waxy" | "crayon" => Some(Self::Waxy),
            "liquid" | "watercolor" => Some(Self::Liquid),
            "graphite" | "pencil" => Some(Self::Graphite),
            "living" => Some(Self::Living),
            _ => None,
        }
    }

    /// Like [`BrushKind::parse`], but unknown names fall back to `Waxy`
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!("Unknown brush type {:?}, falling back to waxy", name);
            Self::Waxy
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Waxy => "waxy",
            Self::Liquid => "liquid",
            Self::Graphite => "graphite",
            Self::Living => "living",
        }
    }

    /// Whether brushes of this kind keep animating after a stroke
    pub fn supports_animation(self) -> bool {
        matches!(self, Self::Living)
    }
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters shared by every brush style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushParams {
    size: f32,
    pub color: ColorRgb,
}

impl BrushParams {
    pub fn new(size: f32, color: ColorRgb) -> Result<Self, PaintError> {
        Ok(Self {
            size: validate_size(size)?,
            color,
        })
    }

    /// Diameter in pixels, always > 0
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Update the size; invalid sizes are rejected and the old one is kept
    pub fn set_size(&mut self, size: f32) -> Result<(), PaintError> {
        self.size = validate_size(size)?;
        Ok(())
    }
}

impl Default for BrushParams {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: ColorRgb::new(0xff, 0x44, 0x44),
        }
    }
}

/// The stroke protocol implemented by every brush style
pub trait Brush {
    fn kind(&self) -> BrushKind;

    fn params(&self) -> &BrushParams;
    fn params_mut(&mut self) -> &mut BrushParams;

    fn size(&self) -> f32 {
        self.params().size()
    }

    fn color(&self) -> ColorRgb {
        self.params().color
    }

    fn set_size(&mut self, size: f32) -> Result<(), PaintError> {
        self.params_mut().set_size(size)
    }

    fn set_color(&mut self, color: ColorRgb) {
        self.params_mut().color = color;
    }

    /// Reset per-stroke state at pointer-down, possibly drawing an initial dot
    fn start_stroke(&mut self, target: &mut dyn RenderTarget, point: Vec2);

    /// Draw the segment between two consecutive pointer samples
    fn continue_stroke(&mut self, target: &mut dyn RenderTarget, from: Vec2, to: Vec2);

    /// Finish the stroke at pointer-up
    fn end_stroke(&mut self, _target: &mut dyn RenderTarget, _scheduler: &mut dyn FrameScheduler) {
    }

    fn supports_animation(&self) -> bool {
        self.kind().supports_animation()
    }

    /// True while this brush is waiting on frame callbacks
    fn is_animating(&self) -> bool {
        false
    }

    /// Halt any animation and drop its state. Always safe to call.
    fn cancel_animation(&mut self, _scheduler: &mut dyn FrameScheduler) {}

    /// Deliver a frame callback
    fn on_tick(
        &mut self,
        _handle: TickHandle,
        _target: &mut dyn RenderTarget,
        _scheduler: &mut dyn FrameScheduler,
    ) -> TickOutcome {
        TickOutcome::Stale
    }
}

/// Build a brush seeded from the operating system
pub fn create_brush(kind: BrushKind, params: BrushParams) -> Box<dyn Brush> {
    build(kind, params, StdRng::from_os_rng())
}

/// Build a brush with a fixed seed, for reproducible output
pub fn create_brush_seeded(kind: BrushKind, params: BrushParams, seed: u64) -> Box<dyn Brush> {
    build(kind, params, StdRng::seed_from_u64(seed))
}

fn build(kind: BrushKind, params: BrushParams, rng: StdRng) -> Box<dyn Brush> {
    debug!(
        "create_brush: {} size={:.1} color={}",
        kind,
        params.size(),
        params.color
    );
    match kind {
        BrushKind::Waxy => Box::new(WaxyBrush::new(params, rng)),
        BrushKind::Liquid => Box::new(LiquidBrush::new(params, rng)),
        BrushKind::Graphite => Box::new(GraphiteBrush::new(params, rng)),
        BrushKind::Living => Box::new(LivingBrush::new(params, rng)),
    }
}

/// Uniform draw in `[min, max)`. Degenerate or reversed ranges are allowed.
#[inline]
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

/// Uniform offset in `[-extent, extent)` on both axes
#[inline]
pub(crate) fn random_offset<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> Vec2 {
    Vec2::new(
        random_between(rng, -extent, extent),
        random_between(rng, -extent, extent),
    )
}

/// Evenly spaced points from `from` to `to` inclusive, about `step` apart.
/// Always yields at least the two endpoints.
pub fn subdivide(from: Vec2, to: Vec2, step: f32) -> impl Iterator<Item = Vec2> {
    let steps = ((from.distance(to) / step).floor() as usize).clamp(1, MAX_SUBDIVISIONS);
    (0..=steps).map(move |i| from.lerp(to, i as f32 / steps as f32))
}
