//! Local repulsion around the pointer.

use glam::Vec2;

use crate::particle::Particle;

/// Distance within which particles are pushed away.
pub const MOUSE_RADIUS: f32 = 100.0;
/// Displacement, in pixels per frame, for a particle directly under the pointer.
pub const PUSH_STRENGTH: f32 = 6.0;

/// Last known pointer position; `None` once it has left the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub pos: Option<Vec2>,
}

impl Pointer {
    pub fn moved(&mut self, x: f32, y: f32) {
        self.pos = Some(Vec2::new(x, y));
    }

    pub fn left(&mut self) {
        self.pos = None;
    }

    /// Pushes every particle inside the capture radius away from the pointer.
    pub fn apply(&self, particles: &mut [Particle]) {
        let Some(pointer) = self.pos else {
            return;
        };
        for p in particles {
            p.pos += displacement(p.pos, pointer);
        }
    }
}

/// Displacement for a particle at `pos` given the pointer at `pointer`.
///
/// Magnitude falls linearly from [`PUSH_STRENGTH`] at distance zero to
/// nothing at [`MOUSE_RADIUS`]. A particle exactly under the pointer is
/// pushed along `+x`.
pub fn displacement(pos: Vec2, pointer: Vec2) -> Vec2 {
    let away = pos - pointer;
    let dist = away.length();
    if dist >= MOUSE_RADIUS {
        return Vec2::ZERO;
    }
    let force = (MOUSE_RADIUS - dist) / MOUSE_RADIUS;
    let dir = away.try_normalize().unwrap_or(Vec2::X);
    dir * force * PUSH_STRENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn zero_at_capture_boundary_and_beyond() {
        let pointer = Vec2::new(50.0, 50.0);
        assert_eq!(
            displacement(pointer + Vec2::new(MOUSE_RADIUS, 0.0), pointer),
            Vec2::ZERO
        );
        assert_eq!(
            displacement(pointer + Vec2::new(0.0, 250.0), pointer),
            Vec2::ZERO
        );
    }

    #[test]
    fn maximum_at_pointer() {
        let pointer = Vec2::new(10.0, 10.0);
        let d = displacement(pointer, pointer);
        assert!((d.length() - PUSH_STRENGTH).abs() < 1e-6);

        let near = displacement(pointer + Vec2::new(1.0, 0.0), pointer);
        assert!(d.length() >= near.length());
    }

    #[test]
    fn continuous_across_boundary() {
        let pointer = Vec2::ZERO;
        let eps = 1e-3;
        let inside = displacement(Vec2::new(MOUSE_RADIUS - eps, 0.0), pointer);
        let outside = displacement(Vec2::new(MOUSE_RADIUS + eps, 0.0), pointer);
        assert!((inside - outside).length() < 1e-3);
    }

    #[test]
    fn pushes_away_from_pointer() {
        let d = displacement(Vec2::new(0.0, -30.0), Vec2::ZERO);
        assert!(d.y < 0.0);
        assert!(d.x.abs() < 1e-6);
    }

    #[test]
    fn left_pointer_moves_nothing() {
        let mut pointer = Pointer::default();
        pointer.moved(0.0, 0.0);
        pointer.left();

        let mut ps = vec![Particle::new(0, Vec2::new(1.0, 1.0), 1.0, Rgba::ZINC_900)];
        pointer.apply(&mut ps);
        assert_eq!(ps[0].pos, Vec2::new(1.0, 1.0));
    }
}
