//! Graphite (pencil) brush
//!
//! There is no hardware pressure, so pressure is synthesized from how far the
//! pointer travelled since the last sample: faster strokes press lighter and
//! draw thinner lines.

use std::collections::VecDeque;

use glam::Vec2;
use rand::rngs::StdRng;
use tracing::debug;

use super::{Brush, BrushKind, BrushParams, random_between, random_offset};
use crate::constants::{
    GRAPHITE_DOT_ALPHA, GRAPHITE_HISTORY_CAPACITY, GRAPHITE_LINE_ALPHA, GRAPHITE_MAX_PRESSURE,
    GRAPHITE_MAX_SPEED, GRAPHITE_MIN_PRESSURE, GRAPHITE_SPECK_SPACING, GRAPHITE_THINNING,
    GRAPHITE_TIME_UNIT, MAX_SUBDIVISIONS,
};
use crate::render::{RenderTarget, Scoped};
use crate::scheduler::FrameScheduler;
use crate::types::{LineCap, LineStyle};

/// A pointer sample with the pressure it was drawn at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPoint {
    pub position: Vec2,
    pub pressure: f32,
}

/// Speed of a segment, in distance per time unit, capped at the max speed
pub fn speed_for_distance(distance: f32) -> f32 {
    (distance / GRAPHITE_TIME_UNIT).clamp(0.0, GRAPHITE_MAX_SPEED)
}

/// Pressure falls linearly with speed and stays within
/// `[GRAPHITE_MIN_PRESSURE, GRAPHITE_MAX_PRESSURE]`
pub fn pressure_for_speed(speed: f32) -> f32 {
    // NaN compares false everywhere, so treat it as a standstill
    let speed = if speed.is_nan() { 0.0 } else { speed.clamp(0.0, GRAPHITE_MAX_SPEED) };
    (1.0 - GRAPHITE_THINNING * speed / GRAPHITE_MAX_SPEED)
        .clamp(GRAPHITE_MIN_PRESSURE, GRAPHITE_MAX_PRESSURE)
}

pub struct GraphiteBrush {
    params: BrushParams,
    rng: StdRng,
    history: VecDeque<TrackedPoint>,
    pressure: f32,
    speed: f32,
}

impl GraphiteBrush {
    pub fn new(params: BrushParams, rng: StdRng) -> Self {
        Self {
            params,
            rng,
            history: VecDeque::with_capacity(GRAPHITE_HISTORY_CAPACITY),
            pressure: GRAPHITE_MAX_PRESSURE,
            speed: 0.0,
        }
    }

    pub fn history(&self) -> &VecDeque<TrackedPoint> {
        &self.history
    }

    /// Pressure of the most recent segment
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    fn track(&mut self, position: Vec2, pressure: f32) {
        if self.history.len() == GRAPHITE_HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(TrackedPoint { position, pressure });
    }

    /// Scatter faint specks along the segment for a grainy edge
    fn draw_specks(&mut self, target: &mut dyn RenderTarget, from: Vec2, to: Vec2) {
        let distance = from.distance(to);
        if distance < 1.0 {
            return;
        }

        let weight = self.params.size() * self.pressure;
        let spread = weight * 0.3;
        let count = ((distance / GRAPHITE_SPECK_SPACING).ceil() as usize).min(MAX_SUBDIVISIONS);
        for i in 0..count {
            let t = i as f32 / count as f32;
            let center = from.lerp(to, t) + random_offset(&mut self.rng, spread);
            let radius = random_between(&mut self.rng, 0.1, weight * 0.3);
            let mut scope = Scoped::new(target);
            scope.set_alpha(random_between(&mut self.rng, 0.1, 0.3));
            scope.fill_circle(center, radius, self.params.color);
        }
    }
}

impl Brush for GraphiteBrush {
    fn kind(&self) -> BrushKind {
        BrushKind::Graphite
    }

    fn params(&self) -> &BrushParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut BrushParams {
        &mut self.params
    }

    fn start_stroke(&mut self, target: &mut dyn RenderTarget, point: Vec2) {
        self.history.clear();
        self.pressure = GRAPHITE_MAX_PRESSURE;
        self.speed = 0.0;
        self.track(point, GRAPHITE_MAX_PRESSURE);

        let mut scope = Scoped::new(target);
        scope.set_alpha(GRAPHITE_DOT_ALPHA);
        scope.fill_circle(point, self.params.size() / 4.0, self.params.color);
    }

    fn continue_stroke(&mut self, target: &mut dyn RenderTarget, from: Vec2, to: Vec2) {
        self.speed = speed_for_distance(from.distance(to));
        self.pressure = pressure_for_speed(self.speed);
        self.track(to, self.pressure);

        // Bridge from the previous tracked point so fast moves leave no gaps
        let Some(last) = self.history.len().checked_sub(2).and_then(|i| self.history.get(i)) else {
            return;
        };
        let start = last.position;

        let style = LineStyle::new(self.params.size() * self.pressure, self.params.color)
            .with_cap(LineCap::Round);
        {
            let mut scope = Scoped::new(target);
            scope.set_alpha(GRAPHITE_LINE_ALPHA);
            scope.stroke_line(start, to, &style);
        }
        self.draw_specks(target, start, to);

        debug!(
            "GraphiteBrush::continue_stroke: speed={:.2} pressure={:.2}",
            self.speed, self.pressure
        );
    }

    fn end_stroke(&mut self, _target: &mut dyn RenderTarget, _scheduler: &mut dyn FrameScheduler) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;
    use crate::scheduler::ManualScheduler;
    use crate::types::ColorRgb;
    use rand::SeedableRng;

    fn brush(seed: u64) -> GraphiteBrush {
        let params = BrushParams::new(8.0, ColorRgb::new(0x33, 0x33, 0x33)).unwrap();
        GraphiteBrush::new(params, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_pressure_monotonic_and_clamped() {
        let mut last = f32::INFINITY;
        for i in 0..2000 {
            let distance = i as f32 * 0.1;
            let pressure = pressure_for_speed(speed_for_distance(distance));
            assert!(pressure <= last, "pressure rose at distance {distance}");
            assert!((GRAPHITE_MIN_PRESSURE..=GRAPHITE_MAX_PRESSURE).contains(&pressure));
            last = pressure;
        }
    }

    #[test]
    fn test_pressure_handles_degenerate_speeds() {
        for speed in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -5.0, 1e9] {
            let pressure = pressure_for_speed(speed);
            assert!((GRAPHITE_MIN_PRESSURE..=GRAPHITE_MAX_PRESSURE).contains(&pressure));
        }
        assert_eq!(pressure_for_speed(0.0), 1.0);
        assert!((pressure_for_speed(GRAPHITE_MAX_SPEED) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut graphite = brush(1);
        let mut canvas = Canvas::new(200, 50);
        let mut last = Vec2::new(5.0, 25.0);
        graphite.start_stroke(&mut canvas, last);
        for _ in 0..25 {
            let next = last + Vec2::new(6.0, 0.0);
            graphite.continue_stroke(&mut canvas, last, next);
            last = next;
        }
        assert_eq!(graphite.history().len(), GRAPHITE_HISTORY_CAPACITY);
        assert_eq!(graphite.history().back().map(|p| p.position), Some(last));
    }

    #[test]
    fn test_fast_segments_press_lighter() {
        let mut graphite = brush(2);
        let mut canvas = Canvas::new(200, 50);
        graphite.start_stroke(&mut canvas, Vec2::new(0.0, 25.0));

        graphite.continue_stroke(&mut canvas, Vec2::new(0.0, 25.0), Vec2::new(2.0, 25.0));
        let slow = graphite.pressure();
        graphite.continue_stroke(&mut canvas, Vec2::new(2.0, 25.0), Vec2::new(60.0, 25.0));
        let fast = graphite.pressure();

        assert!(fast < slow);
        assert!(canvas.surface().get_pixel(30, 25).unwrap()[3] > 0.0);
    }

    #[test]
    fn test_huge_jump_draws_bounded_specks() {
        let mut graphite = brush(4);
        let mut canvas = Canvas::new(64, 64);
        graphite.start_stroke(&mut canvas, Vec2::new(10.0, 10.0));
        graphite.continue_stroke(&mut canvas, Vec2::new(10.0, 10.0), Vec2::new(4e7, 10.0));

        // Start dot, the line, then one speck per subdivision up to the cap
        assert_eq!(canvas.draw_calls(), 2 + MAX_SUBDIVISIONS as u64);
    }

    #[test]
    fn test_click_draws_dot_and_clears_history() {
        let mut graphite = brush(3);
        let mut canvas = Canvas::new(32, 32);
        let mut scheduler = ManualScheduler::new();

        graphite.start_stroke(&mut canvas, Vec2::new(16.0, 16.0));
        assert_eq!(graphite.history().len(), 1);
        assert_eq!(graphite.history()[0].pressure, 1.0);
        assert!(canvas.surface().get_pixel(16, 16).unwrap()[3] > 0.0);

        graphite.end_stroke(&mut canvas, &mut scheduler);
        assert!(graphite.history().is_empty());
    }
}
