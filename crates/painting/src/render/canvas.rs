//! Software rasterizer implementing [`RenderTarget`] over a tiled CPU surface

use glam::Vec2;
use tracing::trace;

use super::{ClipCircle, DrawState, RenderTarget};
use crate::surface::CpuSurface;
use crate::tiles::{TileCoord, TiledSurface};
use crate::types::{BlendMode, ColorRgb, LineCap, LineStyle};

/// The drawing surface handed to brushes.
///
/// Shapes are rasterized with a one-pixel anti-aliased edge. Every public draw
/// call increments a counter, which hosts can use for diagnostics and tests use
/// to check how much work a brush issued.
pub struct Canvas {
    tiles: TiledSurface,
    state: DrawState,
    saved: Vec<DrawState>,
    draw_calls: u64,
}

/// Pixel-space bounding box, clipped to the surface
struct PixelBounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Canvas {
    /// Create a transparent canvas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            tiles: TiledSurface::with_default_tile_size(width, height),
            state: DrawState::default(),
            saved: Vec::new(),
            draw_calls: 0,
        }
    }

    pub fn surface(&self) -> &CpuSurface {
        self.tiles.surface()
    }

    /// Consume the canvas, keeping only its pixels
    pub fn into_surface(self) -> CpuSurface {
        self.tiles.surface
    }

    pub fn tiles(&self) -> &TiledSurface {
        &self.tiles
    }

    /// Drain the tiles touched since the last call
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        self.tiles.take_dirty_tiles()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Total draw calls issued against this canvas
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    fn bounds(&self, min: Vec2, max: Vec2) -> Option<PixelBounds> {
        let surface = self.tiles.surface();
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(surface.width as f32);
        let y1 = max.y.ceil().min(surface.height as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelBounds {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }

    /// Visit every pixel in `bounds` whose combined shape and clip coverage is
    /// positive, then mark the region dirty.
    fn rasterize(
        &mut self,
        bounds: PixelBounds,
        mut coverage: impl FnMut(Vec2) -> f32,
        mut write: impl FnMut(&mut CpuSurface, u32, u32, f32),
    ) {
        let clips = std::mem::take(&mut self.state.clips);
        let surface = self.tiles.surface_mut();
        for py in bounds.y0..bounds.y1 {
            for px in bounds.x0..bounds.x1 {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let cov = coverage(center) * clip_coverage(&clips, center);
                if cov > 0.0 {
                    write(surface, px, py, cov);
                }
            }
        }
        self.state.clips = clips;
        self.tiles.mark_region_dirty(
            bounds.x0,
            bounds.y0,
            bounds.x1 - bounds.x0,
            bounds.y1 - bounds.y0,
        );
    }
}

/// Anti-aliased coverage of a pixel whose center lies `distance` from an edge
/// at `radius` (1.0 well inside, 0.0 well outside)
#[inline]
fn edge_coverage(radius: f32, distance: f32) -> f32 {
    (radius - distance + 0.5).clamp(0.0, 1.0)
}

fn clip_coverage(clips: &[ClipCircle], point: Vec2) -> f32 {
    clips
        .iter()
        .map(|clip| edge_coverage(clip.radius, point.distance(clip.center)))
        .product()
}

/// Distance from `p` to the segment `a..b`, or None when the projection of `p`
/// falls outside the segment and the ends are not rounded
fn segment_distance(p: Vec2, a: Vec2, b: Vec2, clamp_ends: bool) -> Option<f32> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return clamp_ends.then(|| p.distance(a));
    }
    let t = (p - a).dot(ab) / len_sq;
    if !clamp_ends && !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(p.distance(a + ab * t.clamp(0.0, 1.0)))
}

impl RenderTarget for Canvas {
    fn width(&self) -> u32 {
        self.tiles.surface().width
    }

    fn height(&self) -> u32 {
        self.tiles.surface().height
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.blend_mode = mode;
    }

    fn clip_circle(&mut self, center: Vec2, radius: f32) {
        self.state.clips.push(ClipCircle { center, radius });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: ColorRgb) {
        self.draw_calls += 1;
        if !(radius > 0.0) || self.state.alpha <= 0.0 {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        let Some(bounds) = self.bounds(center - reach, center + reach) else {
            return;
        };

        let rgba = color.to_rgba(self.state.alpha);
        let mode = self.state.blend_mode;
        self.rasterize(
            bounds,
            |p| edge_coverage(radius, p.distance(center)),
            |surface, x, y, cov| surface.blend_pixel(x, y, rgba, cov, mode),
        );
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, style: &LineStyle) {
        self.draw_calls += 1;
        let half = style.width / 2.0;
        if !(half > 0.0) || self.state.alpha <= 0.0 {
            return;
        }

        // Square caps are butt caps on a segment extended by half the width
        let (a, b) = match style.cap {
            LineCap::Square => {
                let dir = (to - from).normalize_or_zero() * half;
                (from - dir, to + dir)
            }
            LineCap::Butt | LineCap::Round => (from, to),
        };
        let round = style.cap == LineCap::Round;

        let reach = Vec2::splat(half + 1.0);
        let Some(bounds) = self.bounds(a.min(b) - reach, a.max(b) + reach) else {
            return;
        };

        trace!(
            "stroke_line: ({:.1}, {:.1}) -> ({:.1}, {:.1}) width={:.2} cap={:?}",
            from.x, from.y, to.x, to.y, style.width, style.cap
        );

        let rgba = style.color.to_rgba(self.state.alpha);
        let mode = self.state.blend_mode;
        self.rasterize(
            bounds,
            |p| segment_distance(p, a, b, round).map_or(0.0, |d| edge_coverage(half, d)),
            |surface, x, y, cov| surface.blend_pixel(x, y, rgba, cov, mode),
        );
    }

    fn blit_image(&mut self, image: &CpuSurface, origin: Vec2, size: Vec2) {
        self.draw_calls += 1;
        if size.x <= 0.0 || size.y <= 0.0 || image.width == 0 || image.height == 0 {
            return;
        }
        let Some(bounds) = self.bounds(origin, origin + size) else {
            return;
        };

        let alpha = self.state.alpha;
        let mode = self.state.blend_mode;
        let scale = Vec2::new(image.width as f32, image.height as f32) / size;
        let sample = |p: Vec2| {
            // Nearest-neighbour lookup of the source texel under this pixel
            let uv = (p - origin) * scale;
            let sx = (uv.x.max(0.0) as u32).min(image.width - 1);
            let sy = (uv.y.max(0.0) as u32).min(image.height - 1);
            image.get_pixel(sx, sy).unwrap_or([0.0; 4])
        };
        let inside = |p: Vec2| {
            p.x >= origin.x && p.y >= origin.y && p.x < origin.x + size.x && p.y < origin.y + size.y
        };

        self.rasterize(
            bounds,
            |p| if inside(p) { 1.0 } else { 0.0 },
            |surface, x, y, cov| {
                let texel = sample(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                surface.blend_pixel(x, y, texel, cov * alpha, mode);
            },
        );
    }

    fn clear_rect(&mut self, origin: Vec2, size: Vec2) {
        self.draw_calls += 1;
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let Some(bounds) = self.bounds(origin, origin + size) else {
            return;
        };
        self.rasterize(
            bounds,
            |_| 1.0,
            |surface, x, y, _| surface.clear_pixel(x, y),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(canvas: &Canvas, x: u32, y: u32) -> f32 {
        canvas.surface().get_pixel(x, y).unwrap()[3]
    }

    #[test]
    fn test_fill_circle_covers_center_not_outside() {
        let mut canvas = Canvas::new(64, 64);
        canvas.fill_circle(Vec2::new(32.0, 32.0), 5.0, ColorRgb::new(255, 0, 0));

        let center = canvas.surface().get_pixel(32, 32).unwrap();
        assert!((center[0] - 1.0).abs() < 0.01);
        assert!((center[3] - 1.0).abs() < 0.01);
        assert_eq!(alpha_at(&canvas, 32, 45), 0.0);
        assert_eq!(canvas.draw_calls(), 1);
        assert!(!canvas.take_dirty_tiles().is_empty());
    }

    #[test]
    fn test_fill_circle_uses_state_alpha() {
        let mut canvas = Canvas::new(32, 32);
        canvas.set_alpha(0.8);
        canvas.fill_circle(Vec2::new(16.0, 16.0), 4.0, ColorRgb::BLACK);
        assert!((alpha_at(&canvas, 16, 16) - 0.8).abs() < 0.01);
    }

    #[test]
    fn test_offscreen_draw_still_counts() {
        let mut canvas = Canvas::new(16, 16);
        canvas.fill_circle(Vec2::new(-100.0, -100.0), 3.0, ColorRgb::BLACK);
        assert_eq!(canvas.draw_calls(), 1);
        assert_eq!(canvas.surface().painted_pixel_count(), 0);
        assert!(canvas.take_dirty_tiles().is_empty());
    }

    #[test]
    fn test_clip_limits_fill() {
        let mut canvas = Canvas::new(64, 64);
        canvas.clip_circle(Vec2::new(10.0, 32.0), 3.0);
        canvas.fill_circle(Vec2::new(32.0, 32.0), 30.0, ColorRgb::BLACK);

        assert!(alpha_at(&canvas, 10, 32) > 0.9);
        assert_eq!(alpha_at(&canvas, 32, 32), 0.0);
    }

    #[test]
    fn test_clip_survives_successive_draws() {
        let mut canvas = Canvas::new(64, 64);
        canvas.clip_circle(Vec2::new(10.0, 32.0), 3.0);
        canvas.fill_circle(Vec2::new(32.0, 32.0), 30.0, ColorRgb::BLACK);
        canvas.clear_rect(Vec2::new(0.0, 0.0), Vec2::new(64.0, 64.0));
        canvas.fill_circle(Vec2::new(50.0, 32.0), 10.0, ColorRgb::BLACK);

        assert_eq!(canvas.state().clips.len(), 1);
        assert_eq!(canvas.surface().painted_pixel_count(), 0);
    }

    #[test]
    fn test_stroke_line_round_and_butt_caps() {
        let mut canvas = Canvas::new(64, 64);
        let style = LineStyle::new(4.0, ColorRgb::BLACK);
        canvas.stroke_line(Vec2::new(10.0, 20.0), Vec2::new(50.0, 20.0), &style);

        assert!(alpha_at(&canvas, 30, 20) > 0.9);
        // Butt cap: nothing past the end point
        assert_eq!(alpha_at(&canvas, 8, 20), 0.0);

        let round = style.with_cap(LineCap::Round);
        canvas.stroke_line(Vec2::new(10.0, 40.0), Vec2::new(50.0, 40.0), &round);
        assert!(alpha_at(&canvas, 8, 40) > 0.5);
    }

    #[test]
    fn test_blit_image_scales_source() {
        let mut image = CpuSurface::new(2, 2);
        image.set_pixel(0, 0, [1.0, 0.0, 0.0, 1.0]);

        let mut canvas = Canvas::new(32, 32);
        canvas.blit_image(&image, Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0));

        // Top-left quadrant comes from the single opaque texel
        assert!(alpha_at(&canvas, 5, 5) > 0.99);
        assert_eq!(alpha_at(&canvas, 15, 15), 0.0);
        assert_eq!(alpha_at(&canvas, 25, 5), 0.0);
    }

    #[test]
    fn test_clear_rect() {
        let mut canvas = Canvas::new(32, 32);
        canvas.fill_circle(Vec2::new(16.0, 16.0), 10.0, ColorRgb::BLACK);
        canvas.clear_rect(Vec2::new(10.0, 10.0), Vec2::new(12.0, 12.0));

        assert_eq!(alpha_at(&canvas, 16, 16), 0.0);
        assert!(alpha_at(&canvas, 16, 8) > 0.9);
    }
}
