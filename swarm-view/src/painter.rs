//! [`Surface`] implementation over an [`egui::Painter`].

use glam::Vec2;
use swarm_core::{color::Rgba, surface::Surface};

pub fn to_color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

pub fn from_color32(c: egui::Color32) -> Rgba {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    Rgba::new(r, g, b, a)
}

/// Draws stage coordinates (origin top-left of the canvas) at `origin` in
/// screen space.
///
/// egui has no persistent canvas, so a transparent [`Surface::clear`] is a
/// no-op; the viewer paints the background itself before the stage draws.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    pub fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y)
    }
}

impl Surface for EguiSurface<'_> {
    fn clear(&mut self, color: Rgba) {
        if color.a == 0 {
            return;
        }
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, to_color32(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.painter
            .circle_filled(self.to_screen(center), radius, to_color32(color));
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba) {
        self.painter.line_segment(
            [self.to_screen(a), self.to_screen(b)],
            egui::Stroke::new(width, to_color32(color)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_convert_both_ways() {
        assert_eq!(from_color32(to_color32(Rgba::SKY_500)), Rgba::SKY_500);
        assert_eq!(to_color32(Rgba::TRANSPARENT).a(), 0);
        assert_eq!(from_color32(to_color32(Rgba::ZINC_900)), Rgba::ZINC_900);
    }

    #[test]
    fn stage_points_are_offset_by_the_origin() {
        let ctx = egui::Context::default();
        let painter = egui::Painter::new(
            ctx,
            egui::LayerId::background(),
            egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(100.0, 100.0)),
        );
        let surface = EguiSurface::new(&painter, egui::pos2(40.0, 10.0));
        assert_eq!(surface.to_screen(Vec2::new(5.0, 5.0)), egui::pos2(45.0, 15.0));
    }
}
