//! Drawing targets for the renderer.
//!
//! The engine only needs three primitives, expressed by [`Surface`].
//! [`PixelBuffer`] is a software RGBA8 implementation; hosts with their own
//! 2-D API (the egui viewer) implement the trait over their painter.

use glam::Vec2;
use image::{Pixel, RgbaImage};

use crate::color::Rgba;

pub trait Surface {
    /// Clears the whole surface to `color` (no blending).
    fn clear(&mut self, color: Rgba);
    /// Fills a disc, blending `color` over what is already there.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Draws a line segment of the given width.
    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba);
}

/// Software RGBA8 target backed by an [`RgbaImage`], blending source-over.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: RgbaImage::new(width as u32, height as u32),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        let [r, g, b, a] = self.image.get_pixel_checked(x as u32, y as u32)?.0;
        Some(Rgba::new(r, g, b, a))
    }

    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.image.pixels().filter(|px| px.0[3] > 0).count()
    }

    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn blend(&mut self, x: usize, y: usize, src: Rgba, coverage: f32) {
        let alpha = (src.a as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
        if alpha == 0 {
            return;
        }
        self.image
            .get_pixel_mut(x as u32, y as u32)
            .blend(&image::Rgba([src.r, src.g, src.b, alpha]));
    }

    /// Pixel-index range covering `[lo, hi]`, clipped to `[0, len)`.
    fn span(lo: f32, hi: f32, len: usize) -> std::ops::Range<usize> {
        let start = lo.floor().max(0.0) as usize;
        let end = (hi.ceil().max(0.0) as usize).min(len);
        start.min(end)..end
    }
}

impl Surface for PixelBuffer {
    fn clear(&mut self, color: Rgba) {
        let fill = image::Rgba([color.r, color.g, color.b, color.a]);
        for px in self.image.pixels_mut() {
            *px = fill;
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 || !center.is_finite() {
            return;
        }
        // One pixel of antialiasing at the rim.
        let outer = radius + 0.5;
        for y in Self::span(center.y - outer, center.y + outer, self.height()) {
            for x in Self::span(center.x - outer, center.x + outer, self.width()) {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (outer - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba) {
        if width <= 0.0 || !a.is_finite() || !b.is_finite() {
            return;
        }
        let half = width * 0.5 + 0.5;
        let min = a.min(b) - Vec2::splat(half);
        let max = a.max(b) + Vec2::splat(half);
        let ab = b - a;
        let len2 = ab.length_squared();

        for y in Self::span(min.y, max.y, self.height()) {
            for x in Self::span(min.x, max.x, self.width()) {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len2 > 0.0 {
                    ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(a + ab * t);
                let coverage = (half - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }
}
