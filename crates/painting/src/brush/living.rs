//! Living brush: the stroke is laid down as particles that come alive once
//! the pointer lifts, drifting on gravity and wind while they evaporate.

use glam::Vec2;
use rand::rngs::StdRng;
use tracing::debug;

use super::{Brush, BrushKind, BrushParams, random_between, random_offset, subdivide};
use crate::animation::{Particle, ParticleAnimator, ParticlePhysics, TickOutcome};
use crate::constants::{LIVING_LIFESPAN, LIVING_MAX_STEP};
use crate::render::RenderTarget;
use crate::scheduler::{FrameScheduler, TickHandle};

pub struct LivingBrush {
    params: BrushParams,
    rng: StdRng,
    /// Particles placed by the stroke in progress
    stroke: Vec<Particle>,
    animator: ParticleAnimator,
    lifespan: u32,
}

impl LivingBrush {
    pub fn new(params: BrushParams, rng: StdRng) -> Self {
        Self {
            params,
            rng,
            stroke: Vec::new(),
            animator: ParticleAnimator::new(ParticlePhysics::default()),
            lifespan: LIVING_LIFESPAN,
        }
    }

    /// Particles drawn by the current stroke, not yet airborne
    pub fn stroke_particles(&self) -> &[Particle] {
        &self.stroke
    }

    /// Particles currently driven by the animation loop
    pub fn animating_particles(&self) -> &[Particle] {
        self.animator.particles()
    }

    pub fn animator(&self) -> &ParticleAnimator {
        &self.animator
    }

    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    /// Distance between particles along a segment
    fn step_distance(&self) -> f32 {
        (self.params.size() / 4.0).min(LIVING_MAX_STEP)
    }

    /// Place and draw one particle near `point`
    fn place(&mut self, target: &mut dyn RenderTarget, point: Vec2) {
        let size = self.params.size();
        let position = point + random_offset(&mut self.rng, size / 10.0);
        let particle = Particle::new(
            position,
            size * random_between(&mut self.rng, 0.8, 1.2),
            random_between(&mut self.rng, 0.7, 1.0),
            self.params.color,
            self.lifespan,
        );
        particle.draw(target);
        self.stroke.push(particle);
    }
}

impl Brush for LivingBrush {
    fn kind(&self) -> BrushKind {
        BrushKind::Living
    }

    fn params(&self) -> &BrushParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut BrushParams {
        &mut self.params
    }

    fn start_stroke(&mut self, target: &mut dyn RenderTarget, point: Vec2) {
        self.stroke.clear();
        self.place(target, point);
    }

    fn continue_stroke(&mut self, target: &mut dyn RenderTarget, from: Vec2, to: Vec2) {
        let step = self.step_distance();
        let before = self.stroke.len();
        for point in subdivide(from, to, step) {
            self.place(target, point);
        }
        debug!(
            "LivingBrush::continue_stroke: {} particles placed ({} in stroke)",
            self.stroke.len() - before,
            self.stroke.len()
        );
    }

    /// Launch every buffered particle with an upward kick
    fn end_stroke(&mut self, _target: &mut dyn RenderTarget, scheduler: &mut dyn FrameScheduler) {
        let rng = &mut self.rng;
        let launched = self.stroke.drain(..).map(|mut particle| {
            particle.velocity = Vec2::new(
                random_between(&mut *rng, -0.5, 0.5),
                random_between(&mut *rng, -1.0, 0.0),
            );
            particle
        });
        self.animator.launch(launched, scheduler);
    }

    fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    fn cancel_animation(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.animator.cancel(scheduler);
    }

    fn on_tick(
        &mut self,
        handle: TickHandle,
        target: &mut dyn RenderTarget,
        scheduler: &mut dyn FrameScheduler,
    ) -> TickOutcome {
        self.animator.tick(handle, target, scheduler, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;
    use crate::scheduler::ManualScheduler;
    use crate::types::ColorRgb;
    use rand::SeedableRng;

    fn brush(seed: u64) -> LivingBrush {
        let params = BrushParams::new(10.0, ColorRgb::new(0x40, 0xa0, 0x40)).unwrap();
        LivingBrush::new(params, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_stroke_places_particles_per_step() {
        let mut living = brush(1);
        let mut canvas = Canvas::new(100, 100);
        living.start_stroke(&mut canvas, Vec2::new(10.0, 50.0));
        assert_eq!(living.stroke_particles().len(), 1);

        // Size 10 gives a 2.5px step: 20 steps plus the endpoint
        living.continue_stroke(&mut canvas, Vec2::new(10.0, 50.0), Vec2::new(60.0, 50.0));
        assert_eq!(living.stroke_particles().len(), 22);
        for p in living.stroke_particles() {
            assert_eq!(p.velocity, Vec2::ZERO);
            assert_eq!(p.remaining_life, LIVING_LIFESPAN);
            assert!(p.size >= 8.0 && p.size <= 12.0);
        }
        assert!(!living.is_animating());
    }

    #[test]
    fn test_end_stroke_launches_upward() {
        let mut living = brush(2);
        let mut canvas = Canvas::new(100, 100);
        let mut scheduler = ManualScheduler::new();

        living.start_stroke(&mut canvas, Vec2::new(20.0, 50.0));
        living.continue_stroke(&mut canvas, Vec2::new(20.0, 50.0), Vec2::new(40.0, 50.0));
        let placed = living.stroke_particles().len();
        living.end_stroke(&mut canvas, &mut scheduler);

        assert!(living.stroke_particles().is_empty());
        assert_eq!(living.animating_particles().len(), placed);
        for p in living.animating_particles() {
            assert!(p.velocity.y <= 0.0);
            assert!(p.velocity.x.abs() <= 0.5);
        }
        assert!(living.is_animating());
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_second_stroke_joins_running_animation() {
        let mut living = brush(3);
        let mut canvas = Canvas::new(100, 100);
        let mut scheduler = ManualScheduler::new();

        living.start_stroke(&mut canvas, Vec2::new(20.0, 20.0));
        living.end_stroke(&mut canvas, &mut scheduler);
        living.start_stroke(&mut canvas, Vec2::new(70.0, 70.0));
        living.end_stroke(&mut canvas, &mut scheduler);

        assert_eq!(living.animating_particles().len(), 2);
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_single_point_lives_exactly_lifespan() {
        let mut living = brush(4);
        let mut canvas = Canvas::new(100, 100);
        let mut scheduler = ManualScheduler::new();

        living.start_stroke(&mut canvas, Vec2::new(50.0, 50.0));
        living.end_stroke(&mut canvas, &mut scheduler);
        assert_eq!(living.animating_particles().len(), 1);

        let mut ticks = 0;
        while let Some(handle) = scheduler.pop_due() {
            living.on_tick(handle, &mut canvas, &mut scheduler);
            ticks += 1;
        }

        assert_eq!(ticks, LIVING_LIFESPAN);
        assert!(living.animating_particles().is_empty());
        assert!(!living.is_animating());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_cancel_empties_and_ignores_late_tick() {
        let mut living = brush(5);
        let mut canvas = Canvas::new(100, 100);
        let mut scheduler = ManualScheduler::new();

        living.start_stroke(&mut canvas, Vec2::new(50.0, 50.0));
        living.end_stroke(&mut canvas, &mut scheduler);
        let queued = scheduler.pop_due().unwrap();

        living.cancel_animation(&mut scheduler);
        living.cancel_animation(&mut scheduler);
        assert!(living.animating_particles().is_empty());

        let before = canvas.draw_calls();
        assert_eq!(
            living.on_tick(queued, &mut canvas, &mut scheduler),
            TickOutcome::Stale
        );
        assert_eq!(canvas.draw_calls(), before);
        assert!(scheduler.is_idle());
    }
}
