//! CPU surface for painting - straight-alpha f32 RGBA storage

use crate::types::BlendMode;

/// A CPU RGBA surface for painting
/// Stores pixels as [f32; 4] with straight (non-premultiplied) alpha
#[derive(Clone)]
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Reset a pixel to transparent black
    #[inline]
    pub fn clear_pixel(&mut self, x: u32, y: u32) {
        self.set_pixel(x, y, [0.0; 4]);
    }

    /// Composite a color onto an existing pixel.
    ///
    /// The effective source alpha is `color[3] * coverage`. `Overlay` first mixes
    /// the source with the overlay of source and destination (weighted by the
    /// destination alpha), then composites source-over like `Normal`.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32, mode: BlendMode) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let dst = self.pixels[index];
        let src_alpha = (color[3] * coverage).clamp(0.0, 1.0);
        if src_alpha <= 0.0 {
            return;
        }

        let mut src = [color[0], color[1], color[2]];
        if mode == BlendMode::Overlay {
            for c in 0..3 {
                let mixed = overlay_channel(dst[c], src[c]);
                src[c] = (1.0 - dst[3]) * src[c] + dst[3] * mixed;
            }
        }

        let out_alpha = src_alpha + dst[3] * (1.0 - src_alpha);
        if out_alpha <= f32::EPSILON {
            self.pixels[index] = [0.0; 4];
            return;
        }

        let dst_weight = dst[3] * (1.0 - src_alpha);
        self.pixels[index] = [
            (src[0] * src_alpha + dst[0] * dst_weight) / out_alpha,
            (src[1] * src_alpha + dst[1] * dst_weight) / out_alpha,
            (src[2] * src_alpha + dst[2] * dst_weight) / out_alpha,
            out_alpha,
        ];
    }

    /// Convert to 8-bit straight RGBA, row-major (suitable for PNG encoding)
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Number of pixels with any coverage at all
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0.0).count()
    }
}

/// Overlay of a single channel: multiply when the backdrop is dark, screen when light
#[inline]
fn overlay_channel(backdrop: f32, source: f32) -> f32 {
    if backdrop <= 0.5 {
        2.0 * backdrop * source
    } else {
        1.0 - 2.0 * (1.0 - backdrop) * (1.0 - source)
    }
}
