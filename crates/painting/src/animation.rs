//! Particle physics for the living brush
//!
//! Particles are placed while a stroke is drawn, then launched into the
//! [`ParticleAnimator`] when the stroke ends. The animator runs one physics
//! step per scheduled frame and keeps requesting frames until every particle
//! has died or the animation is cancelled.

use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::brush::random_between;
use crate::constants::{
    LIVING_ALPHA_SCALE, LIVING_ERASE_MARGIN, LIVING_EVAPORATION, LIVING_GRAVITY,
    LIVING_VISIBILITY_FLOOR, LIVING_WIND,
};
use crate::render::{RenderTarget, Scoped};
use crate::scheduler::{FrameScheduler, TickHandle};
use crate::types::ColorRgb;

/// A single animated blob of paint
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Diameter in pixels
    pub size: f32,
    pub original_size: f32,
    /// Opacity 0.0-1.0
    pub alpha: f32,
    pub color: ColorRgb,
    /// Ticks left before the particle dies
    pub remaining_life: u32,
    pub max_life: u32,
}

/// Constants driving a physics step
#[derive(Debug, Clone, PartialEq)]
pub struct ParticlePhysics {
    /// Added to vertical velocity every tick (positive is down)
    pub gravity: f32,
    /// Amplitude of the random horizontal push per tick
    pub wind: f32,
    /// Multiplicative size factor per tick, must be < 1
    pub evaporation: f32,
    /// Particles at or below this size are dropped
    pub visibility_floor: f32,
    /// Extra pixels cleared around a particle's previous footprint
    pub erase_margin: f32,
    /// Alpha at full remaining life
    pub alpha_scale: f32,
}

impl Default for ParticlePhysics {
    fn default() -> Self {
        Self {
            gravity: LIVING_GRAVITY,
            wind: LIVING_WIND,
            evaporation: LIVING_EVAPORATION,
            visibility_floor: LIVING_VISIBILITY_FLOOR,
            erase_margin: LIVING_ERASE_MARGIN,
            alpha_scale: LIVING_ALPHA_SCALE,
        }
    }
}

impl Particle {
    /// A freshly placed particle: at rest with its full life ahead
    pub fn new(position: Vec2, size: f32, alpha: f32, color: ColorRgb, max_life: u32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            original_size: size,
            alpha,
            color,
            remaining_life: max_life,
            max_life,
        }
    }

    pub fn is_alive(&self, physics: &ParticlePhysics) -> bool {
        self.remaining_life > 0 && self.size > physics.visibility_floor
    }

    /// Advance one tick. `wind_sample` is a uniform draw in [0, 1).
    pub fn step(&mut self, physics: &ParticlePhysics, wind_sample: f32) {
        self.remaining_life = self.remaining_life.saturating_sub(1);
        self.velocity.y += physics.gravity;
        self.velocity.x += (wind_sample - 0.5) * physics.wind;
        self.position += self.velocity;
        self.size *= physics.evaporation;
        self.alpha = self.remaining_life as f32 / self.max_life.max(1) as f32 * physics.alpha_scale;
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        let mut scope = Scoped::new(target);
        scope.set_alpha(self.alpha);
        scope.fill_circle(self.position, self.size / 2.0, self.color);
    }

    /// Clear the square this particle currently occupies, plus a margin
    pub fn erase(&self, target: &mut dyn RenderTarget, margin: f32) {
        let half = self.size / 2.0 + margin;
        target.clear_rect(
            self.position - Vec2::splat(half),
            Vec2::splat(self.size + 2.0 * margin),
        );
    }
}

/// What happened when a frame callback reached the animator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick was cancelled or superseded; nothing was drawn
    Stale,
    /// Particles remain and the next frame has been requested
    Continue,
    /// The last particle died; the animator is idle
    Finished,
}

/// Owns the airborne particle set and its frame loop
#[derive(Debug, Default)]
pub struct ParticleAnimator {
    physics: ParticlePhysics,
    particles: Vec<Particle>,
    running: bool,
    pending: Option<TickHandle>,
}

impl ParticleAnimator {
    pub fn new(physics: ParticlePhysics) -> Self {
        Self {
            physics,
            particles: Vec::new(),
            running: false,
            pending: None,
        }
    }

    pub fn physics(&self) -> &ParticlePhysics {
        &self.physics
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The frame request this animator is waiting on
    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Add airborne particles and start the loop if it is not already running
    pub fn launch(
        &mut self,
        particles: impl IntoIterator<Item = Particle>,
        scheduler: &mut dyn FrameScheduler,
    ) {
        let before = self.particles.len();
        self.particles.extend(particles);
        debug!(
            "ParticleAnimator::launch: {} new particles ({} airborne)",
            self.particles.len() - before,
            self.particles.len()
        );

        if !self.running && !self.particles.is_empty() {
            self.running = true;
            self.pending = Some(scheduler.schedule_next_tick());
            debug!("ParticleAnimator: animation started");
        }
    }

    /// Run one frame: erase, step, redraw survivors, and reschedule.
    ///
    /// A handle that is not the one this animator is waiting on (because the
    /// animation was cancelled after it was queued) does nothing.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        handle: TickHandle,
        target: &mut dyn RenderTarget,
        scheduler: &mut dyn FrameScheduler,
        rng: &mut R,
    ) -> TickOutcome {
        if !self.running || self.pending != Some(handle) {
            trace!("ParticleAnimator::tick: stale {:?}", handle);
            return TickOutcome::Stale;
        }
        self.pending = None;

        let physics = &self.physics;
        for particle in &self.particles {
            particle.erase(target, physics.erase_margin);
        }

        self.particles.retain_mut(|particle| {
            particle.step(physics, random_between(rng, 0.0, 1.0));
            let alive = particle.is_alive(physics);
            if alive {
                particle.draw(target);
            }
            alive
        });

        if self.particles.is_empty() {
            self.running = false;
            debug!("ParticleAnimator: all particles expired, animation idle");
            TickOutcome::Finished
        } else {
            self.pending = Some(scheduler.schedule_next_tick());
            trace!("ParticleAnimator::tick: {} survivors", self.particles.len());
            TickOutcome::Continue
        }
    }

    /// Stop the loop and drop every particle. Safe to call at any time.
    pub fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_scheduled(handle);
        }
        if self.running || !self.particles.is_empty() {
            debug!(
                "ParticleAnimator: cancelled with {} particles airborne",
                self.particles.len()
            );
        }
        self.running = false;
        self.particles.clear();
    }
}
