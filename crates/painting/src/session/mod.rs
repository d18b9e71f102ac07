//! Brush session controller
//!
//! This module connects:
//! - Input handling (pointer path and UI commands from `brushwork-ipc`)
//! - The single active brush and its stroke protocol
//! - The render target the brush draws into
//! - The frame scheduler that drives animated brushes
//!
//! The session owns the render target and the scheduler and lends them to the
//! active brush on every call. Installing a new brush always cancels the old
//! one's animation first, so no frame callback can outlive its brush.

mod dispatch;
mod pointer;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::animation::TickOutcome;
use crate::brush::{Brush, BrushKind, BrushParams, create_brush, create_brush_seeded};
use crate::error::PaintError;
use crate::render::RenderTarget;
use crate::scheduler::{FrameScheduler, ManualScheduler, TickHandle};
use crate::types::ColorRgb;

/// Owns exactly one active brush and routes input into it
pub struct BrushSession<T: RenderTarget, S: FrameScheduler> {
    /// Surface every brush draws into
    pub(crate) target: T,
    /// Frame callbacks for animated brushes
    pub(crate) scheduler: S,
    /// The active brush
    pub(crate) brush: Box<dyn Brush>,
    /// Size and color carried over when the brush type changes
    pub(crate) params: BrushParams,
    /// True between pointer-down and pointer-up/leave
    pub(crate) pressing: bool,
    /// Previous pointer sample of the current stroke
    pub(crate) last_point: Vec2,
    /// Seeds each new brush when the session is deterministic
    seeds: Option<StdRng>,
}

impl<T: RenderTarget, S: FrameScheduler> BrushSession<T, S> {
    /// Create a session with `kind` installed
    pub fn new(target: T, scheduler: S, kind: BrushKind, params: BrushParams) -> Self {
        Self::build(target, scheduler, kind, params, None)
    }

    /// Create a session whose brushes draw reproducibly
    pub fn with_seed(
        target: T,
        scheduler: S,
        kind: BrushKind,
        params: BrushParams,
        seed: u64,
    ) -> Self {
        Self::build(target, scheduler, kind, params, Some(StdRng::seed_from_u64(seed)))
    }

    fn build(
        target: T,
        scheduler: S,
        kind: BrushKind,
        params: BrushParams,
        mut seeds: Option<StdRng>,
    ) -> Self {
        let brush = Self::make_brush(&mut seeds, kind, params);
        info!(
            "BrushSession: {}x{} surface, {} brush",
            target.width(),
            target.height(),
            kind
        );
        Self {
            target,
            scheduler,
            brush,
            params,
            pressing: false,
            last_point: Vec2::ZERO,
            seeds,
        }
    }

    fn make_brush(seeds: &mut Option<StdRng>, kind: BrushKind, params: BrushParams) -> Box<dyn Brush> {
        match seeds {
            Some(rng) => create_brush_seeded(kind, params, rng.random()),
            None => create_brush(kind, params),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Hosts pumping their own frame loop pull due handles from here
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn brush(&self) -> &dyn Brush {
        self.brush.as_ref()
    }

    pub fn brush_kind(&self) -> BrushKind {
        self.brush.kind()
    }

    pub fn params(&self) -> &BrushParams {
        &self.params
    }

    pub fn is_pressing(&self) -> bool {
        self.pressing
    }

    /// True while the active brush is waiting on frame callbacks
    pub fn is_animating(&self) -> bool {
        self.brush.is_animating()
    }

    /// Switch brush by name. Unknown names install the waxy brush.
    pub fn select_brush_type(&mut self, name: &str) -> BrushKind {
        let kind = BrushKind::from_name(name);
        self.set_brush_kind(kind);
        kind
    }

    /// Tear down the active brush and install a fresh one of `kind` with the
    /// current size and color. A stroke in progress is abandoned.
    pub fn set_brush_kind(&mut self, kind: BrushKind) {
        self.brush.cancel_animation(&mut self.scheduler);
        if self.pressing {
            debug!("set_brush_kind: abandoning stroke in progress");
            self.pressing = false;
        }

        let previous = self.brush.kind();
        self.brush = Self::make_brush(&mut self.seeds, kind, self.params);
        info!("Brush switched: {} -> {}", previous, kind);
    }

    /// Resize the active brush. Invalid sizes are rejected and the old size stays.
    pub fn resize_brush(&mut self, size: f32) -> Result<(), PaintError> {
        if let Err(err) = self.brush.set_size(size) {
            warn!("resize_brush rejected: {}", err);
            return Err(err);
        }
        self.params = *self.brush.params();
        debug!("resize_brush: {:.1}", self.params.size());
        Ok(())
    }

    pub fn recolor_brush(&mut self, color: ColorRgb) {
        self.brush.set_color(color);
        self.params.color = color;
        debug!("recolor_brush: {}", color);
    }

    /// Parse and apply a color. Malformed colors leave the brush unchanged.
    pub fn set_brush_color_str(&mut self, color: &str) -> Result<(), PaintError> {
        match ColorRgb::parse(color) {
            Ok(parsed) => {
                self.recolor_brush(parsed);
                Ok(())
            }
            Err(err) => {
                warn!("set_brush_color rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Stop any animation, then erase every pixel
    pub fn clear_surface(&mut self) {
        self.brush.cancel_animation(&mut self.scheduler);
        let size = Vec2::new(self.target.width() as f32, self.target.height() as f32);
        self.target.clear_rect(Vec2::ZERO, size);
        info!("Surface cleared");
    }

    /// Deliver a frame callback to the active brush
    pub fn run_frame(&mut self, handle: TickHandle) -> TickOutcome {
        let outcome = self
            .brush
            .on_tick(handle, &mut self.target, &mut self.scheduler);
        if outcome == TickOutcome::Finished {
            info!("Animation finished");
        }
        outcome
    }

    /// Consume the session, returning the render target
    pub fn into_target(self) -> T {
        self.target
    }
}

impl<T: RenderTarget> BrushSession<T, ManualScheduler> {
    /// Run the oldest due frame, if any
    pub fn pump_frame(&mut self) -> Option<TickOutcome> {
        let handle = self.scheduler.pop_due()?;
        Some(self.run_frame(handle))
    }

    /// Pump frames until the scheduler is idle or `max_frames` have run.
    /// Returns the number of frames delivered.
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.pump_frame().is_some() {
            frames += 1;
        }
        frames
    }
}
