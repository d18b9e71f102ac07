//! Per-brush invariants checked through the public API

use glam::Vec2;
use painting::{
    Brush, BrushKind, BrushParams, Canvas, ColorRgb, GRAPHITE_MAX_PRESSURE, GRAPHITE_MIN_PRESSURE,
    LiquidBrush, MAX_SUBDIVISIONS, ManualScheduler, create_brush_seeded, pressure_for_speed,
    speed_for_distance,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn graphite_pressure_never_rises_with_speed() {
    let mut previous = GRAPHITE_MAX_PRESSURE;
    for step in 0..=500 {
        let distance = step as f32 * 0.25;
        let pressure = pressure_for_speed(speed_for_distance(distance));
        assert!(pressure <= previous);
        assert!(pressure >= GRAPHITE_MIN_PRESSURE && pressure <= GRAPHITE_MAX_PRESSURE);
        previous = pressure;
    }
}

#[test]
fn liquid_splatter_grows_within_stroke_and_resets_between() {
    let params = BrushParams::new(14.0, ColorRgb::new(30, 90, 200)).unwrap();
    let mut liquid = LiquidBrush::new(params, StdRng::seed_from_u64(99));
    let mut canvas = Canvas::new(400, 120);
    let mut scheduler = ManualScheduler::new();

    let mut last = Vec2::new(5.0, 60.0);
    liquid.start_stroke(&mut canvas, last);

    let mut sizes: Vec<f32> = Vec::new();
    for i in 1..30 {
        let next = Vec2::new(5.0 + i as f32 * 13.0, if i % 2 == 0 { 20.0 } else { 100.0 });
        liquid.continue_stroke(&mut canvas, last, next);
        last = next;

        // Drops keep their order, so existing ones can be compared index by index
        for (drop, before) in liquid.splatter().iter().zip(&sizes) {
            assert!(drop.size >= *before);
        }
        sizes = liquid.splatter().iter().map(|d| d.size).collect();
    }
    assert!(!sizes.is_empty());

    liquid.end_stroke(&mut canvas, &mut scheduler);
    liquid.start_stroke(&mut canvas, Vec2::new(200.0, 60.0));
    assert!(liquid.splatter().is_empty());
}

#[test]
fn huge_pointer_jump_issues_bounded_draws() {
    // Liquid is the busiest: five circles per point plus whatever splatter it throws
    let bound = (MAX_SUBDIVISIONS as u64 + 1) * 8;
    for kind in BrushKind::ALL {
        let mut brush = create_brush_seeded(kind, BrushParams::default(), 17);
        let mut canvas = Canvas::new(64, 64);
        brush.start_stroke(&mut canvas, Vec2::new(10.0, 10.0));
        brush.continue_stroke(&mut canvas, Vec2::new(10.0, 10.0), Vec2::new(4e7, 10.0));
        assert!(
            canvas.draw_calls() <= bound,
            "{kind:?} issued {} draws",
            canvas.draw_calls()
        );
    }
}
